//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. When it is unset every test returns early. Each test
//! creates its own uniquely named groups and scopes its queries to them, so
//! tests can share one database and run in parallel.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::America::Denver;
use community_calendar_api::{
    app::create_app,
    config::{
        Config, DatabaseConfig, FeedsConfig, IngestionConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
    services::{EventSource, IngestionService, ScrapeError},
};
use domain::models::ScrapedGroupPage;
use fake::{faker::lorem::en::Word, Fake};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Connect to the test database, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn create_test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    run_migrations(&pool).await;
    Some(pool)
}

/// Apply every migration file in order. Already-applied files fail and are
/// ignored.
pub async fn run_migrations(pool: &PgPool) {
    let migration_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("persistence/src/migrations");

    let mut entries: Vec<_> = std::fs::read_dir(&migration_dir)
        .expect("Failed to read migrations directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let sql = std::fs::read_to_string(entry.path()).expect("Failed to read migration file");
        let _ = sqlx::raw_sql(&sql).execute(pool).await;
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rate_limit_per_minute: 0,
            admin_api_key_hash: shared::crypto::sha256_hex(ADMIN_KEY),
        },
        feeds: FeedsConfig {
            calendar_name: "Utah Dev Events".to_string(),
            description: "Tech meetups and events in Utah".to_string(),
            site_url: "https://utahdevevents.com".to_string(),
            uid_domain: "utahdevevents.com".to_string(),
            file_name: "utah-dev-events.ics".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            language: "en-us".to_string(),
            timezone: "America/Denver".to_string(),
            retention_days: 7,
        },
        ingestion: IngestionConfig::default(),
    }
}

/// Event source that serves canned pages keyed by Meetup link.
#[derive(Default)]
pub struct StaticSource {
    pages: Mutex<HashMap<String, ScrapedGroupPage>>,
}

impl StaticSource {
    pub fn set_page(&self, meetup_link: &str, page: ScrapedGroupPage) {
        self.pages.lock().unwrap().insert(meetup_link.to_string(), page);
    }
}

#[async_trait]
impl EventSource for StaticSource {
    async fn fetch_group(&self, meetup_link: &str) -> Result<ScrapedGroupPage, ScrapeError> {
        self.pages
            .lock()
            .unwrap()
            .get(meetup_link)
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                status: 404,
                url: meetup_link.to_string(),
            })
    }
}

pub fn create_test_app(config: Config, pool: PgPool) -> Router {
    let ingestion = Arc::new(IngestionService::new(pool.clone(), Arc::new(StaticSource::default())));
    create_app(config, pool, ingestion)
}

/// A name no other test run will use.
pub fn unique_name(prefix: &str) -> String {
    let word: String = Word().fake();
    format!("{prefix} {word} {}", Uuid::new_v4().simple())
}

/// Calendar day `days` away from today in the feed time zone.
pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().with_timezone(&Denver).date_naive() + Duration::days(days)
}

pub async fn insert_group(pool: &PgPool, name: &str, status: &str, tags: &[&str]) -> Uuid {
    insert_group_with_link(pool, name, status, tags, None).await
}

pub async fn insert_group_with_link(
    pool: &PgPool,
    name: &str,
    status: &str,
    tags: &[&str],
    meetup_link: Option<&str>,
) -> Uuid {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO groups (name, status, tags, meetup_link) VALUES ($1, $2::moderation_status, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(status)
    .bind(&tags)
    .bind(meetup_link)
    .fetch_one(pool)
    .await
    .expect("Failed to insert group")
}

pub struct TestEvent<'a> {
    pub title: &'a str,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub status: &'a str,
    pub tags: &'a [&'a str],
    pub group_id: Option<Uuid>,
}

impl<'a> TestEvent<'a> {
    pub fn approved(title: &'a str, date: NaiveDate, group_id: Uuid) -> Self {
        Self {
            title,
            date,
            start_time: NaiveTime::from_hms_opt(18, 0, 0),
            status: "approved",
            tags: &[],
            group_id: Some(group_id),
        }
    }
}

pub async fn insert_event(pool: &PgPool, event: TestEvent<'_>) -> Uuid {
    let tags: Vec<String> = event.tags.iter().map(|t| t.to_string()).collect();
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO events (title, event_date, start_time, status, tags, group_id)
        VALUES ($1, $2, $3, $4::moderation_status, $5, $6)
        RETURNING id
        "#,
    )
    .bind(event.title)
    .bind(event.date)
    .bind(event.start_time)
    .bind(event.status)
    .bind(&tags)
    .bind(event.group_id)
    .fetch_one(pool)
    .await
    .expect("Failed to insert event")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
