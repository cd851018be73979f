//! crates/marketplace_core/src/domain.rs
//!
//! Defines the pure, core data structures for the course marketplace.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Course Content
//=========================================================================================

/// Difficulty level advertised for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonType {
    Video,
    Text,
    Quiz,
    Assignment,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Video => "video",
            LessonType::Text => "text",
            LessonType::Quiz => "quiz",
            LessonType::Assignment => "assignment",
        }
    }
}

impl FromStr for LessonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(LessonType::Video),
            "text" => Ok(LessonType::Text),
            "quiz" => Ok(LessonType::Quiz),
            "assignment" => Ok(LessonType::Assignment),
            other => Err(format!("unknown lesson type '{}'", other)),
        }
    }
}

/// The smallest addressable unit of content within a module.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub lesson_type: LessonType,
    pub duration: String,
    pub content: String,
    pub video_url: Option<String>,
    pub order: u32,
}

/// A named, ordered group of lessons. Navigation uses the position in
/// `Course::modules`, not `order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub lessons: Vec<Lesson>,
    pub order: u32,
}

/// A purchasable course.
///
/// `price` is never negative and `original_price`, when present, is at least `price`.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub category: String,
    pub level: Level,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: Option<u32>,
    pub duration: String,
    pub rating: f64,
    pub reviews_count: u32,
    pub students_count: u32,
    pub modules: Vec<Module>,
    pub requirements: Vec<String>,
    pub what_you_will_learn: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: NaiveDate,
}

impl Course {
    /// Number of lessons across every module.
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }

    /// The stored discount, or one derived from `original_price`.
    pub fn discount_percent(&self) -> u32 {
        match (self.discount, self.original_price) {
            (Some(discount), _) => discount,
            (None, Some(original)) => crate::util::calculate_discount(original, self.price),
            (None, None) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub course_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub course_count: u32,
    pub is_popular: bool,
    pub subcategories: Vec<Subcategory>,
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub issue_date: NaiveDate,
    pub verification_code: String,
}

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub role: Role,
    pub bio: String,
    pub join_date: NaiveDate,
    pub enrolled_courses: Vec<String>,
    pub completed_courses: Vec<String>,
    pub certificates: Vec<Certificate>,
    pub expertise: Vec<String>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub hashed_password: String,
}

/// Registration data for a brand new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
