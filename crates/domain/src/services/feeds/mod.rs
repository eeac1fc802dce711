//! Calendar feed serializers.
//!
//! Both renderers take events that already went through the selection
//! pipeline and emit them in input order.

pub mod ical;
pub mod rss;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::Event;

pub use ical::render_ical;
pub use rss::render_rss;

/// Channel-level metadata shared by the iCal and RSS renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMetadata {
    pub calendar_name: String,
    pub description: String,
    /// Public site, used for RSS links and item fallbacks.
    pub site_url: String,
    /// Right-hand side of every iCal `UID`.
    pub uid_domain: String,
    /// Suggested download name for the iCal file.
    pub file_name: String,
    /// Absolute URL of the RSS feed itself.
    pub self_link: String,
    pub language: String,
    /// Zone in which event dates and times are interpreted.
    pub timezone: Tz,
}

impl FeedMetadata {
    /// Fallback item link for events without one.
    pub fn event_anchor(&self, event: &Event) -> String {
        format!("{}/#event-{}", self.site_url.trim_end_matches('/'), event.id)
    }
}

/// Start and end instants of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventSpan {
    /// Resolves an event's local date and times in `tz`.
    ///
    /// A missing start means midnight. The end is the explicit end time
    /// (next day when it is earlier than the start), else one hour after the
    /// start, else 23:59 on the event date.
    pub fn of(event: &Event, tz: Tz) -> Self {
        let start = local_to_utc(
            event.event_date,
            event.start_time.unwrap_or(NaiveTime::MIN),
            tz,
        );

        let end = match (event.start_time, event.end_time) {
            (_, Some(end_time)) => {
                let rolls_over = event.start_time.map_or(false, |s| end_time < s);
                let end_date = if rolls_over {
                    event.event_date.succ_opt().unwrap_or(event.event_date)
                } else {
                    event.event_date
                };
                local_to_utc(end_date, end_time, tz)
            }
            (Some(_), None) => start + Duration::hours(1),
            (None, None) => local_to_utc(event.event_date, end_of_day(), tz),
        };

        Self { start, end }
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Interprets a local wall-clock time in `tz` as a UTC instant.
///
/// Ambiguous times resolve to the earliest instant. Times that fall into a
/// daylight-saving gap are shifted forward by one hour.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::fixtures::{date, event};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_local_to_utc_summer_offset() {
        let utc = local_to_utc(date(2025, 6, 10), hm(18, 30), chrono_tz::America::Denver);
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 6, 11, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_winter_offset() {
        let utc = local_to_utc(date(2025, 1, 15), hm(18, 0), chrono_tz::America::Denver);
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 1, 16, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_gap_shifts_forward() {
        // 02:30 does not exist on 2025-03-09 in Denver.
        let utc = local_to_utc(date(2025, 3, 9), hm(2, 30), chrono_tz::America::Denver);
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 3, 9, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_ambiguous_takes_earliest() {
        // 01:30 happens twice on 2025-11-02 in Denver; the first is MDT.
        let utc = local_to_utc(date(2025, 11, 2), hm(1, 30), chrono_tz::America::Denver);
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 11, 2, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_span_defaults_to_one_hour() {
        let mut item = event("e", date(2025, 6, 10));
        item.event.start_time = Some(hm(18, 0));
        let span = EventSpan::of(&item.event, chrono_tz::UTC);
        assert_eq!(span.end - span.start, Duration::hours(1));
    }

    #[test]
    fn test_span_without_times_covers_the_day() {
        let item = event("e", date(2025, 6, 10));
        let span = EventSpan::of(&item.event, chrono_tz::UTC);
        assert_eq!(span.start, Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap());
        assert_eq!(span.end, Utc.with_ymd_and_hms(2025, 6, 10, 23, 59, 0).unwrap());
    }

    #[test]
    fn test_span_end_before_start_rolls_to_next_day() {
        let mut item = event("e", date(2025, 6, 10));
        item.event.start_time = Some(hm(22, 0));
        item.event.end_time = Some(hm(1, 0));
        let span = EventSpan::of(&item.event, chrono_tz::UTC);
        assert_eq!(span.end, Utc.with_ymd_and_hms(2025, 6, 11, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_event_anchor_trims_trailing_slash() {
        let mut meta = testing::metadata();
        meta.site_url = "https://example.com/".into();
        let item = event("e", date(2025, 6, 10));
        assert_eq!(
            meta.event_anchor(&item.event),
            format!("https://example.com/#event-{}", item.event.id)
        );
    }
}
