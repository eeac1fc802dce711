//! The shared event selection pipeline used by listings and feeds.

use chrono::NaiveDate;

use super::selection::matches_selection;
use super::visibility::is_publicly_visible;
use super::window::RetentionWindow;
use crate::models::{EventWithGroup, FilterSelection};

/// Visibility, then the retention window, then the user's selection.
///
/// Input order is preserved.
pub fn select_events(
    events: Vec<EventWithGroup>,
    selection: &FilterSelection,
    window: RetentionWindow,
    today: NaiveDate,
) -> Vec<EventWithGroup> {
    let earliest = window.earliest(today);
    events
        .into_iter()
        .filter(is_publicly_visible)
        .filter(|item| item.event.event_date >= earliest)
        .filter(|item| matches_selection(item, selection))
        .collect()
}
