//! services/api/src/adapters/seed.rs
//!
//! Loads the static demo dataset (courses, categories and users) from JSON.
//! The JSON records are deserialized into "impure" record structs and then
//! converted into the core's domain types.

use chrono::NaiveDate;
use marketplace_core::domain::{
    Category, Certificate, Course, Lesson, LessonType, Level, Module, Role, Subcategory, User,
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// The dataset bundled with the binary.
const BUNDLED_SEED: &str = include_str!("../../data/seed.json");

/// Password given to seeded users that do not carry their own.
pub const DEFAULT_DEMO_PASSWORD: &str = "demo123";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid seed record {id}: {reason}")]
    Record { id: String, reason: String },
}

/// A fully converted dataset, ready to hand to the in-memory adapters.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub courses: Vec<Course>,
    pub categories: Vec<Category>,
    /// Users paired with their plain-text demo password.
    pub users: Vec<(User, String)>,
}

impl SeedData {
    /// Parses the dataset bundled with the binary.
    pub fn bundled() -> Result<Self, SeedError> {
        Self::from_json(BUNDLED_SEED)
    }

    /// Parses a dataset from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        info!("Loading seed data from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        let record: SeedRecord = serde_json::from_str(raw)?;
        let courses = record
            .courses
            .into_iter()
            .map(CourseRecord::to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        let categories = record
            .categories
            .into_iter()
            .map(CategoryRecord::to_domain)
            .collect();
        let users = record
            .users
            .into_iter()
            .map(UserRecord::to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            courses,
            categories,
            users,
        })
    }
}

//=========================================================================================
// "Impure" Seed Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct SeedRecord {
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    courses: Vec<CourseRecord>,
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRecord {
    id: String,
    name: String,
    description: String,
    course_count: u32,
    is_popular: bool,
    #[serde(default)]
    subcategories: Vec<SubcategoryRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubcategoryRecord {
    id: String,
    name: String,
    course_count: u32,
}

impl CategoryRecord {
    fn to_domain(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            description: self.description,
            course_count: self.course_count,
            is_popular: self.is_popular,
            subcategories: self
                .subcategories
                .into_iter()
                .map(|s| Subcategory {
                    id: s.id,
                    name: s.name,
                    course_count: s.course_count,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonRecord {
    id: String,
    title: String,
    #[serde(rename = "type")]
    lesson_type: String,
    duration: String,
    #[serde(default)]
    content: String,
    video_url: Option<String>,
    order: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    duration: String,
    order: u32,
    #[serde(default)]
    lessons: Vec<LessonRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    id: String,
    title: String,
    description: String,
    short_description: String,
    instructor: String,
    instructor_name: String,
    category: String,
    level: String,
    price: f64,
    original_price: Option<f64>,
    discount: Option<u32>,
    duration: String,
    rating: f64,
    reviews_count: u32,
    students_count: u32,
    #[serde(default)]
    modules: Vec<ModuleRecord>,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    what_you_will_learn: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    language: String,
    created_at: String,
    #[serde(default = "default_true")]
    is_published: bool,
    #[serde(default)]
    is_featured: bool,
}

fn default_true() -> bool {
    true
}

impl CourseRecord {
    fn to_domain(self) -> Result<Course, SeedError> {
        let id = self.id;
        let invalid = |reason: String| SeedError::Record {
            id: id.clone(),
            reason,
        };

        if self.price < 0.0 {
            return Err(invalid(format!("negative price {}", self.price)));
        }
        if let Some(original) = self.original_price {
            if original < self.price {
                return Err(invalid(format!(
                    "original price {} is below price {}",
                    original, self.price
                )));
            }
        }
        let level = self.level.parse::<Level>().map_err(invalid)?;
        let created_at = parse_date(&self.created_at).map_err(invalid)?;

        let mut modules = Vec::with_capacity(self.modules.len());
        for module in self.modules {
            let mut lessons = Vec::with_capacity(module.lessons.len());
            for lesson in module.lessons {
                lessons.push(Lesson {
                    lesson_type: lesson.lesson_type.parse::<LessonType>().map_err(invalid)?,
                    id: lesson.id,
                    title: lesson.title,
                    duration: lesson.duration,
                    content: lesson.content,
                    video_url: lesson.video_url,
                    order: lesson.order,
                });
            }
            modules.push(Module {
                id: module.id,
                title: module.title,
                description: module.description,
                duration: module.duration,
                lessons,
                order: module.order,
            });
        }

        Ok(Course {
            title: self.title,
            description: self.description,
            short_description: self.short_description,
            instructor_id: self.instructor,
            instructor_name: self.instructor_name,
            category: self.category,
            level,
            price: self.price,
            original_price: self.original_price,
            discount: self.discount,
            duration: self.duration,
            rating: self.rating,
            reviews_count: self.reviews_count,
            students_count: self.students_count,
            modules,
            requirements: self.requirements,
            what_you_will_learn: self.what_you_will_learn,
            tags: self.tags,
            language: self.language,
            is_published: self.is_published,
            is_featured: self.is_featured,
            created_at,
            id,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificateRecord {
    id: String,
    course_id: String,
    course_name: String,
    issue_date: String,
    verification_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    avatar: String,
    role: String,
    #[serde(default)]
    bio: String,
    join_date: String,
    #[serde(default)]
    enrolled_courses: Vec<String>,
    #[serde(default)]
    completed_courses: Vec<String>,
    #[serde(default)]
    certificates: Vec<CertificateRecord>,
    #[serde(default)]
    expertise: Vec<String>,
    password: Option<String>,
}

impl UserRecord {
    fn to_domain(self) -> Result<(User, String), SeedError> {
        let id = self.id;
        let invalid = |reason: String| SeedError::Record {
            id: id.clone(),
            reason,
        };

        let role = self.role.parse::<Role>().map_err(invalid)?;
        let join_date = parse_date(&self.join_date).map_err(invalid)?;
        let certificates = self
            .certificates
            .into_iter()
            .map(|c| {
                Ok(Certificate {
                    issue_date: parse_date(&c.issue_date)?,
                    id: c.id,
                    course_id: c.course_id,
                    course_name: c.course_name,
                    verification_code: c.verification_code,
                })
            })
            .collect::<Result<Vec<_>, String>>()
            .map_err(invalid)?;
        let password = self
            .password
            .unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.to_string());

        let user = User {
            email: self.email,
            name: self.name,
            avatar: self.avatar,
            role,
            bio: self.bio,
            join_date,
            enrolled_courses: self.enrolled_courses,
            completed_courses: self.completed_courses,
            certificates,
            expertise: self.expertise,
            id,
        };
        Ok((user, password))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_parses() {
        let seed = SeedData::bundled().unwrap();
        assert_eq!(seed.courses.len(), 10);
        assert_eq!(seed.categories.len(), 8);
        assert_eq!(seed.users.len(), 12);

        let react = &seed.courses[0];
        assert_eq!(react.title, "Complete React Developer Course");
        assert_eq!(react.level, Level::Intermediate);
        assert_eq!(react.total_lessons(), 2);

        let (admin, password) = &seed.users[0];
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(password, "admin123");
        let (_, other_password) = seed
            .users
            .iter()
            .find(|(u, _)| u.email == "maria.garcia@example.com")
            .unwrap();
        assert_eq!(other_password, DEFAULT_DEMO_PASSWORD);
    }

    #[test]
    fn rejects_original_price_below_price() {
        let raw = r#"{"courses": [{
            "id": "bad", "title": "t", "description": "d", "shortDescription": "s",
            "instructor": "i", "instructorName": "n", "category": "c", "level": "beginner",
            "price": 50, "originalPrice": 10, "duration": "1h", "rating": 4,
            "reviewsCount": 0, "studentsCount": 0, "language": "English",
            "createdAt": "2023-01-01"
        }]}"#;
        let err = SeedData::from_json(raw).unwrap_err();
        assert!(matches!(err, SeedError::Record { ref id, .. } if id == "bad"));
    }

    #[test]
    fn rejects_unknown_level() {
        let raw = r#"{"courses": [{
            "id": "odd", "title": "t", "description": "d", "shortDescription": "s",
            "instructor": "i", "instructorName": "n", "category": "c", "level": "expert",
            "price": 0, "duration": "1h", "rating": 4,
            "reviewsCount": 0, "studentsCount": 0, "language": "English",
            "createdAt": "2023-01-01"
        }]}"#;
        assert!(SeedData::from_json(raw).is_err());
    }
}
