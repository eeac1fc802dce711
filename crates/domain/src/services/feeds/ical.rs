//! iCalendar (RFC 5545) feed rendering.

use chrono::{DateTime, Utc};
use shared::text::{escape_ical_text, fold_ical_line};

use super::{EventSpan, FeedMetadata};
use crate::models::EventWithGroup;

const CRLF: &str = "\r\n";

fn ical_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Description body: the event text, its group and its tags as paragraphs.
fn event_description(item: &EventWithGroup) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(description) = item
        .event
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        parts.push(description.to_string());
    }
    parts.push(format!("Group: {}", item.group_name()));
    if !item.event.tags.is_empty() {
        parts.push(format!("Tags: {}", item.event.tags.join(", ")));
    }
    parts.join("\n\n")
}

struct CalendarWriter {
    out: String,
}

impl CalendarWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn line(&mut self, content: &str) {
        self.out.push_str(&fold_ical_line(content));
        self.out.push_str(CRLF);
    }

    fn property(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}:{value}"));
    }

    fn text(&mut self, name: &str, value: &str) {
        self.property(name, &escape_ical_text(value));
    }

    fn finish(self) -> String {
        self.out
    }
}

fn write_event(writer: &mut CalendarWriter, item: &EventWithGroup, meta: &FeedMetadata) {
    let event = &item.event;
    let span = EventSpan::of(event, meta.timezone);

    writer.line("BEGIN:VEVENT");
    writer.property("UID", &format!("{}@{}", event.id, meta.uid_domain));
    writer.property("DTSTAMP", &ical_timestamp(event.updated_at));
    writer.property("DTSTART", &ical_timestamp(span.start));
    writer.property("DTEND", &ical_timestamp(span.end));
    writer.text("SUMMARY", &event.title);
    writer.text("DESCRIPTION", &event_description(item));
    if let Some(location) = event.display_location() {
        writer.text("LOCATION", &location);
    }
    if let Some(link) = event.link.as_deref().filter(|l| !l.trim().is_empty()) {
        writer.property("URL", link.trim());
    }
    if !event.tags.is_empty() {
        let categories: Vec<String> = event.tags.iter().map(|t| escape_ical_text(t)).collect();
        writer.property("CATEGORIES", &categories.join(","));
    }
    writer.line("STATUS:CONFIRMED");
    writer.line("SEQUENCE:0");
    writer.line("END:VEVENT");
}

/// Renders a complete `VCALENDAR` with one `VEVENT` per event.
///
/// Output uses CRLF line endings and folds lines at 75 octets. It is fully
/// determined by its inputs.
pub fn render_ical(events: &[EventWithGroup], meta: &FeedMetadata) -> String {
    let mut writer = CalendarWriter::new();
    writer.line("BEGIN:VCALENDAR");
    writer.line("VERSION:2.0");
    writer.property(
        "PRODID",
        &format!("-//{0}//{0} Calendar//EN", meta.calendar_name),
    );
    writer.line("CALSCALE:GREGORIAN");
    writer.line("METHOD:PUBLISH");
    writer.text("X-WR-CALNAME", &meta.calendar_name);
    writer.text("X-WR-CALDESC", &meta.description);
    writer.property("X-WR-TIMEZONE", meta.timezone.name());

    for item in events {
        write_event(&mut writer, item, meta);
    }

    writer.line("END:VCALENDAR");
    writer.finish()
}
