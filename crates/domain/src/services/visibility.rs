//! Public visibility gate.
//!
//! Every consumer runs this check before applying any user-chosen filter.

use crate::models::EventWithGroup;

/// An event is public iff it is approved and its group, if any, is approved.
///
/// A pending or rejected group hides all of its events, including
/// individually approved ones.
pub fn is_publicly_visible(item: &EventWithGroup) -> bool {
    item.event.status.is_approved()
        && item
            .group
            .as_ref()
            .map_or(true, |group| group.status.is_approved())
}
