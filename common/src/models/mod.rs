//! Shared data models.

pub mod user;

// Re-export commonly used types
pub use user::{UserRow, SEED_USER_NAME, USERS_TABLE_DDL};
