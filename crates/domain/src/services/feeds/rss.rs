//! RSS 2.0 feed rendering.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use shared::text::escape_xml;

use super::{EventSpan, FeedMetadata};
use crate::models::EventWithGroup;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// RFC 822 date in GMT, e.g. `Tue, 10 Jun 2025 18:30:00 GMT`.
pub fn rfc822(instant: DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn item_description(item: &EventWithGroup) -> String {
    let event = &item.event;
    let mut parts: Vec<String> = Vec::new();
    if let Some(description) = event
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        parts.push(description.to_string());
    }
    if let Some(location) = event.display_location() {
        parts.push(format!("Location: {location}"));
    }
    if !event.tags.is_empty() {
        parts.push(format!("Tags: {}", event.tags.join(", ")));
    }
    parts.push(format!("Group: {}", item.group_name()));
    parts.join("\n\n")
}

fn write_item(out: &mut String, item: &EventWithGroup, meta: &FeedMetadata) {
    let event = &item.event;
    let span = EventSpan::of(event, meta.timezone);
    let link = event
        .link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| meta.event_anchor(event));

    out.push_str("    <item>\n");
    let _ = writeln!(out, "      <title>{}</title>", escape_xml(&event.title));
    let _ = writeln!(out, "      <link>{}</link>", escape_xml(&link));
    let _ = writeln!(
        out,
        "      <description>{}</description>",
        escape_xml(&item_description(item))
    );
    let _ = writeln!(out, "      <pubDate>{}</pubDate>", rfc822(span.start));
    let _ = writeln!(out, "      <guid isPermaLink=\"false\">{}</guid>", event.id);
    for tag in &event.tags {
        let _ = writeln!(out, "      <category>{}</category>", escape_xml(tag));
    }
    out.push_str("    </item>\n");
}

/// Renders an RSS 2.0 document with one `<item>` per event.
///
/// `now` only feeds `lastBuildDate`; everything else depends on the events.
pub fn render_rss(events: &[EventWithGroup], meta: &FeedMetadata, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<rss version=\"2.0\" xmlns:atom=\"{ATOM_NS}\">");
    out.push_str("  <channel>\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_xml(&meta.calendar_name));
    let _ = writeln!(out, "    <link>{}</link>", escape_xml(&meta.site_url));
    let _ = writeln!(
        out,
        "    <description>{}</description>",
        escape_xml(&meta.description)
    );
    let _ = writeln!(out, "    <language>{}</language>", escape_xml(&meta.language));
    let _ = writeln!(out, "    <lastBuildDate>{}</lastBuildDate>", rfc822(now));
    let _ = writeln!(
        out,
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>",
        escape_xml(&meta.self_link)
    );

    for item in events {
        write_item(&mut out, item, meta);
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::super::testing::metadata;
    use super::*;
    use crate::models::event::fixtures::{date, event, group, in_group, with_tags};
    use crate::models::ModerationStatus;
    use chrono::{NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_channel_header() {
        let xml = render_rss(&[], &metadata(), now());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">"));
        assert!(xml.contains("<title>Utah Dev Events</title>"));
        assert!(xml.contains("<language>en-us</language>"));
        assert!(xml.contains("<lastBuildDate>Tue, 10 Jun 2025 12:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains(
            "<atom:link href=\"https://utahdevevents.com/api/v1/feeds/rss\" rel=\"self\" type=\"application/rss+xml\"/>"
        ));
        assert!(!xml.contains("<item>"));
        assert!(xml.ends_with("</channel>\n</rss>\n"));
    }

    #[test]
    fn test_item_fields() {
        let g = group("Utah Go", ModerationStatus::Approved, &[]);
        let mut item = with_tags(in_group(event("Go & Tell", date(2025, 6, 10)), &g), &["go"]);
        item.event.start_time = NaiveTime::from_hms_opt(18, 30, 0);
        item.event.description = Some("Lightning <talks>".into());
        item.event.location = Some("Lehi".into());
        item.event.link = Some("https://example.com/go?a=1&b=2".into());

        let xml = render_rss(&[item.clone()], &metadata(), now());
        assert!(xml.contains("<title>Go &amp; Tell</title>"));
        assert!(xml.contains("<link>https://example.com/go?a=1&amp;b=2</link>"));
        assert!(xml.contains(
            "<description>Lightning &lt;talks&gt;\n\nLocation: Lehi\n\nTags: go\n\nGroup: Utah Go</description>"
        ));
        assert!(xml.contains("<pubDate>Wed, 11 Jun 2025 00:30:00 GMT</pubDate>"));
        assert!(xml.contains(&format!("<guid isPermaLink=\"false\">{}</guid>", item.event.id)));
        assert!(xml.contains("<category>go</category>"));
    }

    #[test]
    fn test_link_falls_back_to_site_anchor() {
        let item = event("No link", date(2025, 6, 10));
        let xml = render_rss(&[item.clone()], &metadata(), now());
        assert!(xml.contains(&format!(
            "<link>https://utahdevevents.com/#event-{}</link>",
            item.event.id
        )));
        assert!(xml.contains("<description>Group: Unlisted Group</description>"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let item = event("Say \"hi\" & 'bye'", date(2025, 6, 10));
        let xml = render_rss(&[item], &metadata(), now());
        assert!(xml.contains("<title>Say &quot;hi&quot; &amp; &#39;bye&#39;</title>"));
    }

    #[test]
    fn test_only_build_date_depends_on_now() {
        let events = vec![event("a", date(2025, 6, 10)), event("b", date(2025, 6, 11))];
        let later = now() + chrono::Duration::days(1);
        let first = render_rss(&events, &metadata(), now());
        let second = render_rss(&events, &metadata(), later);
        assert_ne!(first, second);
        let strip = |xml: &str| {
            xml.lines()
                .filter(|l| !l.contains("lastBuildDate"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(first.matches("<item>").count(), 2);
    }
}
