//! crates/marketplace_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the marketplace core.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of where courses, users and login sessions actually live.

use async_trait::async_trait;
use crate::domain::{AuthSession, Category, Course, NewUser, ProfileUpdate, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Read access to the static course dataset.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Every course, in dataset order.
    async fn list_courses(&self) -> PortResult<Vec<Course>>;

    /// Returns `PortError::NotFound` when no course has this id. A course that
    /// exists but has no modules is returned as-is.
    async fn get_course_by_id(&self, course_id: &str) -> PortResult<Course>;

    async fn list_categories(&self) -> PortResult<Vec<Category>>;
}

/// Owns user records. Replaces a shared, mutable list of users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `PortError::Conflict` if the email is already registered.
    async fn create(&self, new_user: NewUser) -> PortResult<User>;

    async fn find_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn find_by_id(&self, user_id: &str) -> PortResult<User>;

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> PortResult<User>;

    async fn list_users(&self) -> PortResult<Vec<User>>;
}

/// Storage-agnostic login session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: AuthSession) -> PortResult<()>;

    /// Returns `PortError::Unauthorized` for unknown or expired tokens.
    async fn load(&self, token: &str) -> PortResult<AuthSession>;

    async fn clear(&self, token: &str) -> PortResult<()>;
}
