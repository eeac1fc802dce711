//! Domain layer for the community calendar backend.
//!
//! This crate contains:
//! - Domain models (Event, Group, FilterSelection, scraped records)
//! - Pure services: tag aggregation, visibility gate, selection predicates,
//!   retention windows, feed rendering and ingestion shaping
//! - Domain error types

pub mod models;
pub mod services;
