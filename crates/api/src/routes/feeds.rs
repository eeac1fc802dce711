//! Calendar feed routes.
//!
//! Feeds only honour `groups` and `tags`; the date constraint never applies
//! and the retention window replaces the upcoming-only cut-off.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::{EventWithGroup, FilterSelection};
use domain::services::{render_ical, render_rss, select_events};
use persistence::repositories::EventRepository;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::AppState;
use crate::config::FeedsConfig;
use crate::error::ApiError;
use crate::middleware::metrics::record_feed_rendered;

pub const ICAL_PATH: &str = "/api/v1/feeds/ical";
pub const RSS_PATH: &str = "/api/v1/feeds/rss";

const ICAL_FORMAT: &str = "iCal";
const RSS_FORMAT: &str = "RSS";

/// Query parameters accepted by every feed route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub groups: Option<String>,
    pub tags: Option<String>,
}

impl FeedQuery {
    fn selection(&self) -> Result<FilterSelection, domain::models::SelectionError> {
        FilterSelection::from_params(self.groups.as_deref(), self.tags.as_deref(), None)
    }
}

/// Subscription URLs for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLinks {
    pub ical_url: String,
    pub webcal_url: String,
    pub rss_url: String,
}

fn with_query(base: String, query: &str) -> String {
    if query.is_empty() {
        base
    } else {
        format!("{base}?{query}")
    }
}

/// Builds the feed URLs that reproduce `selection`.
pub fn feed_links(feeds: &FeedsConfig, selection: &FilterSelection) -> FeedLinks {
    let query = selection.to_query_string();
    let ical_url = with_query(feeds.public_url(ICAL_PATH), &query);
    let webcal_url = match ical_url.split_once("://") {
        Some((_, rest)) => format!("webcal://{rest}"),
        None => ical_url.clone(),
    };

    FeedLinks {
        ical_url,
        webcal_url,
        rss_url: with_query(feeds.public_url(RSS_PATH), &query),
    }
}

async fn feed_events(
    state: &AppState,
    query: &FeedQuery,
    format: &str,
) -> Result<Vec<EventWithGroup>, ApiError> {
    let selection = query.selection().map_err(|e| ApiError::feed(format, e))?;
    let feeds = &state.config.feeds;
    let window = feeds.window();
    let today = feeds.today(Utc::now());

    let rows = EventRepository::new(state.pool.clone())
        .list_approved_since(window.earliest(today))
        .await
        .map_err(|e| ApiError::feed(format, e))?;
    let events: Vec<EventWithGroup> = rows.into_iter().map(Into::into).collect();

    Ok(select_events(events, &selection, window, today))
}

/// iCalendar subscription feed.
///
/// GET /api/v1/feeds/ical
pub async fn ical_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let events = feed_events(&state, &query, ICAL_FORMAT).await?;
    let meta = state.config.feeds.metadata();
    let body = render_ical(&events, &meta);

    record_feed_rendered("ical", events.len());
    info!(events = events.len(), groups = ?query.groups, tags = ?query.tags, "iCal feed rendered");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", meta.file_name),
            ),
        ],
        body,
    ))
}

/// RSS 2.0 feed.
///
/// GET /api/v1/feeds/rss
pub async fn rss_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let events = feed_events(&state, &query, RSS_FORMAT).await?;
    let body = render_rss(&events, &state.config.feeds.metadata(), Utc::now());

    record_feed_rendered("rss", events.len());
    info!(events = events.len(), groups = ?query.groups, tags = ?query.tags, "RSS feed rendered");

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        body,
    ))
}

/// Subscription URLs for the given selection.
///
/// GET /api/v1/feeds/links
pub async fn links(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedLinks>, ApiError> {
    let selection = query.selection()?;
    Ok(Json(feed_links(&state.config.feeds, &selection)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use uuid::Uuid;

    fn feeds() -> FeedsConfig {
        Config::load_for_test(&[("feeds.public_base_url", "https://cal.example.com/")])
            .unwrap()
            .feeds
    }

    #[test]
    fn test_links_without_selection() {
        let links = feed_links(&feeds(), &FilterSelection::default());
        assert_eq!(links.ical_url, "https://cal.example.com/api/v1/feeds/ical");
        assert_eq!(links.webcal_url, "webcal://cal.example.com/api/v1/feeds/ical");
        assert_eq!(links.rss_url, "https://cal.example.com/api/v1/feeds/rss");
    }

    #[test]
    fn test_links_carry_selection() {
        let id = Uuid::parse_str("6f0c1a3e-7d1b-4c43-9a55-0d3f4b2e8a10").unwrap();
        let selection = FilterSelection::new([id], ["rust", "go"], None);
        let links = feed_links(&feeds(), &selection);
        let query = "groups=6f0c1a3e-7d1b-4c43-9a55-0d3f4b2e8a10&tags=go%2Crust";
        assert_eq!(links.ical_url, format!("https://cal.example.com/api/v1/feeds/ical?{query}"));
        assert_eq!(links.rss_url, format!("https://cal.example.com/api/v1/feeds/rss?{query}"));
        assert!(links.webcal_url.starts_with("webcal://cal.example.com/"));
    }

    #[test]
    fn test_query_selection_rejects_bad_group() {
        let query = FeedQuery {
            groups: Some("not-a-uuid".into()),
            tags: None,
        };
        assert!(query.selection().is_err());
    }

    #[test]
    fn test_query_selection_ignores_empty_segments() {
        let query = FeedQuery {
            groups: Some(" , ".into()),
            tags: Some("rust,,".into()),
        };
        let selection = query.selection().unwrap();
        assert!(selection.group_ids().is_empty());
        assert_eq!(selection.tags().len(), 1);
    }
}
