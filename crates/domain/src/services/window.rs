//! Upcoming and retention windows over event dates.

use chrono::{Days, NaiveDate};

use crate::models::EventWithGroup;

/// Drops events that ended more than `grace_days` before today.
///
/// Browsing uses [`RetentionWindow::UPCOMING`] (today or later), feeds use a
/// trailing window so subscribers keep recently past events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow {
    pub grace_days: u32,
}

impl RetentionWindow {
    /// Today or later.
    pub const UPCOMING: Self = Self { grace_days: 0 };

    /// Default trailing window for feeds.
    pub const DEFAULT_FEED_DAYS: u32 = 7;

    pub const fn trailing(days: u32) -> Self {
        Self { grace_days: days }
    }

    /// Earliest date kept relative to `today`.
    pub fn earliest(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.grace_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn includes(&self, event_date: NaiveDate, today: NaiveDate) -> bool {
        event_date >= self.earliest(today)
    }

    /// Keeps the events inside the window, preserving order.
    pub fn restrict(&self, events: Vec<EventWithGroup>, today: NaiveDate) -> Vec<EventWithGroup> {
        let earliest = self.earliest(today);
        events
            .into_iter()
            .filter(|item| item.event.event_date >= earliest)
            .collect()
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self::trailing(Self::DEFAULT_FEED_DAYS)
    }
}
