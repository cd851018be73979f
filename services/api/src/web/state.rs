//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-user learning sessions.

use crate::adapters::{InMemoryCourseRepository, InMemorySessionStore, InMemoryUserRepository, SeedData};
use crate::config::Config;
use crate::error::ApiError;
use crate::password::PasswordHasher;
use marketplace_core::domain::{Course, UserCredentials};
use marketplace_core::navigation::LearningSession;
use marketplace_core::ports::{CourseRepository, SessionStore, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub passwords: PasswordHasher,
    pub learning: LearningSessions,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the in-memory adapters from a loaded dataset, hashing every demo
    /// password up front.
    pub fn from_seed(config: Arc<Config>, seed: SeedData) -> Result<Self, ApiError> {
        let passwords =
            PasswordHasher::new(config.password_memory_kib, config.password_iterations)?;

        let mut credentials = Vec::with_capacity(seed.users.len());
        for (user, password) in seed.users {
            credentials.push(UserCredentials {
                hashed_password: passwords.hash(&password)?,
                user,
            });
        }
        info!(
            "Seeded {} courses, {} categories and {} users",
            seed.courses.len(),
            seed.categories.len(),
            credentials.len()
        );

        Ok(Self {
            courses: Arc::new(InMemoryCourseRepository::new(seed.courses, seed.categories)),
            users: Arc::new(InMemoryUserRepository::new(credentials)),
            sessions: Arc::new(InMemorySessionStore::new()),
            passwords,
            learning: LearningSessions::default(),
            config,
        })
    }
}

//=========================================================================================
// LearningSessions (One Lesson Player Per User)
//=========================================================================================

/// Each user owns at most one learning session. The per-session mutex keeps
/// navigation requests from the same user strictly sequential.
#[derive(Clone, Default)]
pub struct LearningSessions {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<LearningSession>>>>>,
}

impl LearningSessions {
    /// Starts a session on `course`, replacing (and resetting) any previous one.
    ///
    /// The map lock is released before waiting on the user's own session, so a
    /// busy session never stalls other users.
    pub async fn start(&self, user_id: &str, course: Course) -> Arc<Mutex<LearningSession>> {
        let existing = {
            let mut sessions = self.inner.write().await;
            match sessions.get(user_id) {
                Some(existing) => existing.clone(),
                None => {
                    let session = Arc::new(Mutex::new(LearningSession::new(course)));
                    sessions.insert(user_id.to_string(), session.clone());
                    return session;
                }
            }
        };

        existing.lock().await.load_course(course);
        existing
    }

    pub async fn get(&self, user_id: &str) -> Option<Arc<Mutex<LearningSession>>> {
        self.inner.read().await.get(user_id).cloned()
    }

    pub async fn end(&self, user_id: &str) {
        self.inner.write().await.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn courses() -> Vec<Course> {
        SeedData::bundled().unwrap().courses
    }

    #[tokio::test]
    async fn restarting_resets_the_same_session() {
        let courses = courses();
        let sessions = LearningSessions::default();
        let first = sessions.start("student-1", courses[0].clone()).await;
        first.lock().await.mark_current_complete();

        let second = sessions.start("student-1", courses[1].clone()).await;
        assert!(Arc::ptr_eq(&first, &second));
        let session = second.lock().await;
        assert_eq!(session.course().id, courses[1].id);
        assert!(session.completed().is_empty());
    }

    #[tokio::test]
    async fn a_busy_session_does_not_block_other_users() {
        let courses = courses();
        let sessions = LearningSessions::default();
        let session = sessions.start("student-1", courses[0].clone()).await;
        sessions.start("student-2", courses[0].clone()).await;

        // Hold student-1's session while a restart for the same user waits on it.
        let guard = session.lock().await;
        let restart = {
            let sessions = sessions.clone();
            let course = courses[1].clone();
            tokio::spawn(async move { sessions.start("student-1", course).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let other = tokio::time::timeout(Duration::from_millis(200), sessions.get("student-2")).await;
        assert!(matches!(other, Ok(Some(_))));
        assert!(!restart.is_finished());

        drop(guard);
        let restarted = restart.await.unwrap();
        assert_eq!(restarted.lock().await.course().id, courses[1].id);
    }
}
