//! Persistence layer for the community calendar backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations, applied by the API binary at startup

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
