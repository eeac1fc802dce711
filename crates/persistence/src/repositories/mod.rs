//! Repository implementations for database operations.

pub mod event;
pub mod group;

pub use event::{EventRepository, NewEvent};
pub use group::{GroupRepository, NewGroup};
