//! services/api/src/adapters/memory.rs
//!
//! In-memory implementations of the core's ports. Everything lives for the
//! lifetime of the process and is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use marketplace_core::domain::{
    AuthSession, Category, Course, NewUser, ProfileUpdate, User, UserCredentials,
};
use marketplace_core::ports::{
    CourseRepository, PortError, PortResult, SessionStore, UserRepository,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// Courses
//=========================================================================================

/// Read-only course dataset loaded once at startup.
pub struct InMemoryCourseRepository {
    courses: Vec<Course>,
    categories: Vec<Category>,
}

impl InMemoryCourseRepository {
    pub fn new(courses: Vec<Course>, categories: Vec<Category>) -> Self {
        Self {
            courses,
            categories,
        }
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn list_courses(&self) -> PortResult<Vec<Course>> {
        Ok(self.courses.clone())
    }

    async fn get_course_by_id(&self, course_id: &str) -> PortResult<Course> {
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))
    }

    async fn list_categories(&self) -> PortResult<Vec<Category>> {
        Ok(self.categories.clone())
    }
}

//=========================================================================================
// Users
//=========================================================================================

pub struct InMemoryUserRepository {
    users: RwLock<Vec<UserCredentials>>,
}

impl InMemoryUserRepository {
    /// Seeds the repository with already-hashed credentials.
    pub fn new(users: Vec<UserCredentials>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> PortResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|c| c.user.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(PortError::Conflict(format!(
                "User with email {} already exists",
                new_user.email
            )));
        }

        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            avatar: format!(
                "https://ui-avatars.com/api/?name={}&background=3B82F6&color=fff",
                new_user.name.replace(' ', "+")
            ),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            bio: String::new(),
            join_date: Utc::now().date_naive(),
            enrolled_courses: Vec::new(),
            completed_courses: Vec::new(),
            certificates: Vec::new(),
            expertise: Vec::new(),
        };
        info!("Registered user {} ({})", user.id, user.role);
        users.push(UserCredentials {
            user: user.clone(),
            hashed_password: new_user.hashed_password,
        });
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.users
            .read()
            .await
            .iter()
            .find(|c| c.user.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn find_by_id(&self, user_id: &str) -> PortResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> PortResult<User> {
        let mut users = self.users.write().await;
        let creds = users
            .iter_mut()
            .find(|c| c.user.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;

        if let Some(name) = update.name {
            creds.user.name = name;
        }
        if let Some(avatar) = update.avatar {
            creds.user.avatar = avatar;
        }
        if let Some(bio) = update.bio {
            creds.user.bio = bio;
        }
        Ok(creds.user.clone())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .map(|c| c.user.clone())
            .collect())
    }
}

//=========================================================================================
// Login Sessions
//=========================================================================================

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: AuthSession) -> PortResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn load(&self, token: &str) -> PortResult<AuthSession> {
        let session = self
            .sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(PortError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            debug!("Dropping expired session for user {}", session.user_id);
            self.sessions.write().await.remove(token);
            return Err(PortError::Unauthorized);
        }
        Ok(session)
    }

    async fn clear(&self, token: &str) -> PortResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}
