pub mod catalog;
pub mod dashboard;
pub mod domain;
pub mod navigation;
pub mod ports;
pub mod util;

pub use catalog::{filter_and_sort, CatalogFacets, FilterCriteria, PriceRange, SortKey};
pub use dashboard::{AdminStats, InstructorStats, NavItem, StudentStats};
pub use domain::{
    AuthSession, Category, Certificate, Course, Lesson, LessonType, Level, Module, NewUser,
    ProfileUpdate, Role, Subcategory, User, UserCredentials,
};
pub use navigation::{LearningSession, LessonCursor, NavigationError};
pub use ports::{CourseRepository, PortError, PortResult, SessionStore, UserRepository};
