//! Meetup group page scraper.
//!
//! Fetches a group's `/events/` listing and turns its event cards into
//! [`ScrapedEvent`] records in the feed time zone.

use std::time::Duration;

use async_trait::async_trait;
use chrono_tz::Tz;
use domain::models::{ScrapedEvent, ScrapedGroupPage};
use domain::services::ingestion::{extract_meetup_event_id, meetup_events_url, parse_event_timestamp};
use domain::services::SourceLinkError;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use shared::text::clean_text;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::ingestion::EventSource;
use crate::config::IngestionConfig;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while scraping a group page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid group link: {0}")]
    Link(#[from] SourceLinkError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

// ============================================================================
// Selectors
// ============================================================================

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

lazy_static! {
    /// Card selectors in order of preference; the first that matches wins.
    static ref CARD_SELECTORS: Vec<Selector> = vec![
        selector("section[data-testid='event-list'] article[eventid]"),
        selector("article[data-event-id]"),
        selector("[id^='event-card-e-']"),
    ];
    static ref TITLE: Selector = selector("h3");
    static ref EVENT_LINK: Selector = selector("a[href*='/events/']");
    static ref TIME_WITH_ATTR: Selector = selector("time[datetime]");
    static ref TIME: Selector = selector("time");
    static ref DESCRIPTION: Selector = selector("p");
    static ref LOCATION: Selector = selector("[data-testid='event-card-location']");
    static ref VENUE: Selector = selector("[data-testid='venue-name']");
    static ref IMAGE: Selector = selector("img[src]");
    static ref TOPICS: Selector = selector("[data-testid='group-topics'] a, a[href*='/topics/']");
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| clean_text(&node.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn absolute_url(base: &Url, href: Option<String>) -> Option<String> {
    let href = href?;
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href);
    }
    base.join(&href).ok().map(|u| u.to_string())
}

fn parse_card(card: ElementRef<'_>, base: &Url, tz: Tz) -> ScrapedEvent {
    let link = absolute_url(base, first_attr(&card, &EVENT_LINK, "href"));
    let external_id = card
        .value()
        .attr("eventid")
        .or_else(|| card.value().attr("data-event-id"))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| link.as_deref().and_then(extract_meetup_event_id));

    let timestamp = first_attr(&card, &TIME_WITH_ATTR, "datetime").or_else(|| first_text(&card, &TIME));
    let (event_date, start_time) = match timestamp.as_deref().and_then(|raw| parse_event_timestamp(raw, tz)) {
        Some((date, time)) => (Some(date), Some(time)),
        None => (None, None),
    };

    ScrapedEvent {
        title: first_text(&card, &TITLE).unwrap_or_default(),
        link,
        external_id,
        event_date,
        start_time,
        location: first_text(&card, &LOCATION),
        venue_name: first_text(&card, &VENUE),
        description: first_text(&card, &DESCRIPTION),
        image_url: first_attr(&card, &IMAGE, "src"),
    }
}

/// Parses a Meetup events listing. `base` resolves relative links and at
/// most `max_events` cards are read.
pub fn parse_group_page(html: &str, base: &Url, tz: Tz, max_events: usize) -> ScrapedGroupPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let events = CARD_SELECTORS
        .iter()
        .map(|sel| root.select(sel).take(max_events).collect::<Vec<_>>())
        .find(|cards| !cards.is_empty())
        .unwrap_or_default()
        .into_iter()
        .map(|card| parse_card(card, base, tz))
        .collect();

    let mut topics: Vec<String> = Vec::new();
    for topic in root.select(&TOPICS) {
        let text = clean_text(&topic.text().collect::<Vec<_>>().join(" "));
        if !text.is_empty() && !topics.contains(&text) {
            topics.push(text);
        }
    }

    ScrapedGroupPage { events, topics }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP scraper for Meetup group pages.
pub struct MeetupScraper {
    client: Client,
    tz: Tz,
    max_events: usize,
}

impl MeetupScraper {
    /// Create a scraper that converts times into `tz`.
    pub fn new(config: &IngestionConfig, tz: Tz) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            tz,
            max_events: config.max_events_per_group,
        })
    }
}

#[async_trait]
impl EventSource for MeetupScraper {
    async fn fetch_group(&self, meetup_link: &str) -> Result<ScrapedGroupPage, ScrapeError> {
        let url = meetup_events_url(meetup_link)?;
        let base = Url::parse(&url).map_err(|_| SourceLinkError::InvalidUrl(url.clone()))?;

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let html = response.text().await?;

        let page = parse_group_page(&html, &base, self.tz, self.max_events);
        debug!(
            url = %url,
            events = page.events.len(),
            topics = page.topics.len(),
            "Scraped Meetup group page"
        );
        Ok(page)
    }
}
