//! Shared utilities and common types for the community calendar backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Hashing utilities (stable identifiers, admin key checks)
//! - Text escaping for iCalendar and XML output
//! - Common validation logic for submissions

pub mod crypto;
pub mod text;
pub mod validation;
