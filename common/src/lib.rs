//! Shared building blocks for the user service.
//!
//! Contains configuration loading, the application error type,
//! data models and HTTP middleware.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
