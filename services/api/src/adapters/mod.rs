pub mod memory;
pub mod seed;

pub use memory::{InMemoryCourseRepository, InMemorySessionStore, InMemoryUserRepository};
pub use seed::{SeedData, SeedError};
