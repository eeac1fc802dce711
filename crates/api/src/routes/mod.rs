//! HTTP route handlers.

pub mod admin;
pub mod events;
pub mod feeds;
pub mod groups;
pub mod health;
pub mod tags;
