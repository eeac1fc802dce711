//! Shaping of scraped records into store upserts.
//!
//! Nothing here performs I/O; the scraper feeds raw records in and the
//! ingestion service writes the results.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use shared::crypto::sha256_hex;
use shared::text::clean_text;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::models::{EventUpsert, ScrapedEvent, Venue};

lazy_static! {
    static ref MEETUP_EVENT_ID: Regex = Regex::new(r"/events/(\d+)").unwrap();
    static ref ZONE_SUFFIX: Regex = Regex::new(r"\[[^\]]*\]$").unwrap();
}

/// Why a scraped record was not turned into an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("event has no title")]
    MissingTitle,
    #[error("event has no date")]
    MissingDate,
    #[error("event has neither a source id nor a link")]
    MissingIdentity,
}

/// Errors from interpreting a group's source link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceLinkError {
    #[error("invalid link: {0}")]
    InvalidUrl(String),
    #[error("not a Meetup group link: {0}")]
    NotMeetupGroup(String),
}

/// Numeric Meetup event id from a link such as `.../events/305012345/`.
pub fn extract_meetup_event_id(link: &str) -> Option<String> {
    MEETUP_EVENT_ID
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The group slug of a Meetup link, e.g. `utah-rust` for
/// `https://www.meetup.com/utah-rust/`.
pub fn meetup_slug(meetup_link: &str) -> Result<String, SourceLinkError> {
    let url =
        Url::parse(meetup_link.trim()).map_err(|_| SourceLinkError::InvalidUrl(meetup_link.into()))?;
    let is_meetup = url
        .host_str()
        .map_or(false, |h| h == "meetup.com" || h.ends_with(".meetup.com"));
    if !is_meetup {
        return Err(SourceLinkError::NotMeetupGroup(meetup_link.into()));
    }
    url.path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| SourceLinkError::NotMeetupGroup(meetup_link.into()))
}

/// Upcoming events page for a Meetup group.
pub fn meetup_events_url(meetup_link: &str) -> Result<String, SourceLinkError> {
    let slug = meetup_slug(meetup_link)?;
    Ok(format!("https://www.meetup.com/{slug}/events/"))
}

/// Stable identifier for a group derived from its source links.
///
/// Meetup groups use `meetup:<slug>`; any other link is hashed. Returns
/// `None` when the group has no usable link.
pub fn group_external_id(meetup_link: Option<&str>, luma_link: Option<&str>) -> Option<String> {
    if let Some(slug) = meetup_link.and_then(|link| meetup_slug(link).ok()) {
        return Some(format!("meetup:{}", slug.to_lowercase()));
    }
    [meetup_link, luma_link]
        .into_iter()
        .flatten()
        .map(|link| link.trim().trim_end_matches('/').to_lowercase())
        .find(|link| !link.is_empty())
        .map(|link| format!("link:{}", sha256_hex(&link)))
}

/// Parses a scraped `datetime` attribute into a local date and time in `tz`.
///
/// Accepts RFC 3339 (optionally followed by a `[Zone]` suffix), epoch
/// milliseconds, and naive local timestamps.
pub fn parse_event_timestamp(raw: &str, tz: Tz) -> Option<(NaiveDate, NaiveTime)> {
    let trimmed = ZONE_SUFFIX.replace(raw.trim(), "");
    let value = trimmed.trim();
    if value.is_empty() {
        return None;
    }

    let instant: Option<DateTime<Utc>> = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        Some(dt.with_timezone(&Utc))
    } else if value.chars().all(|c| c.is_ascii_digit()) {
        value
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    } else {
        None
    };

    if let Some(instant) = instant {
        let local = instant.with_timezone(&tz).naive_local();
        return Some((local.date(), local.time()));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|local| (local.date(), local.time()))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| (d, NaiveTime::MIN))
        })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(clean_text).filter(|v| !v.is_empty())
}

/// Turns a scraped record into an upsert for `group_id`.
///
/// The external id is the Meetup event id when the link carries one,
/// otherwise the link itself.
pub fn prepare_upsert(group_id: Uuid, scraped: &ScrapedEvent) -> Result<EventUpsert, SkipReason> {
    let title = clean_text(&scraped.title);
    if title.is_empty() {
        return Err(SkipReason::MissingTitle);
    }
    let event_date = scraped.event_date.ok_or(SkipReason::MissingDate)?;

    let link = non_blank(scraped.link.as_deref());
    let external_id = non_blank(scraped.external_id.as_deref())
        .or_else(|| link.as_deref().and_then(extract_meetup_event_id))
        .or_else(|| link.clone())
        .ok_or(SkipReason::MissingIdentity)?;

    Ok(EventUpsert {
        group_id,
        external_id,
        title,
        event_date,
        start_time: scraped.start_time,
        location: non_blank(scraped.location.as_deref()),
        venue: Venue {
            name: non_blank(scraped.venue_name.as_deref()),
            ..Venue::default()
        },
        description: scraped
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        link,
        image_url: non_blank(scraped.image_url.as_deref()),
    })
}

/// Converts a UTC instant to local date and time in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> (NaiveDate, NaiveTime) {
    let local = tz.from_utc_datetime(&instant.naive_utc()).naive_local();
    (local.date(), local.time())
}
