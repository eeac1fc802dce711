use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use domain::services::{FeedMetadata, RetentionWindow};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Origins allowed on the JSON API. Feeds always allow any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Submissions per client IP per minute (0 disables limiting)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// SHA-256 hex digest of the admin API key
    #[serde(default)]
    pub admin_api_key_hash: String,
}

/// Calendar feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    #[serde(default = "default_calendar_description")]
    pub description: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,

    #[serde(default = "default_feed_file_name")]
    pub file_name: String,

    /// Public origin of this API, used to build absolute feed URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// IANA zone in which event dates and times are interpreted
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Days of past events kept in feeds
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Denver;

impl FeedsConfig {
    /// The configured zone, falling back to [`DEFAULT_TIMEZONE`].
    ///
    /// `Config::load` rejects unknown zones, so the fallback only applies to
    /// hand-built configs.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Calendar day in the feed zone at `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz()).date_naive()
    }

    pub fn window(&self) -> RetentionWindow {
        RetentionWindow::trailing(self.retention_days)
    }

    /// Absolute URL of a path on this API.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url.trim_end_matches('/'), path)
    }

    pub fn metadata(&self) -> FeedMetadata {
        FeedMetadata {
            calendar_name: self.calendar_name.clone(),
            description: self.description.clone(),
            site_url: self.site_url.clone(),
            uid_domain: self.uid_domain.clone(),
            file_name: self.file_name.clone(),
            self_link: self.public_url("/api/v1/feeds/rss"),
            language: self.language.clone(),
            timezone: self.tz(),
        }
    }
}

/// Scheduled scraping of group event pages.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_ingestion_interval")]
    pub interval_minutes: u64,

    #[serde(default = "default_max_events_per_group")]
    pub max_events_per_group: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_scrape_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: default_ingestion_interval(),
            max_events_per_group: default_max_events_per_group(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_scrape_timeout(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    10
}
fn default_calendar_name() -> String {
    "Utah Dev Events".to_string()
}
fn default_calendar_description() -> String {
    "Developer meetups and tech events across Utah".to_string()
}
fn default_site_url() -> String {
    "https://utahdevevents.com".to_string()
}
fn default_uid_domain() -> String {
    "utahdevevents.com".to_string()
}
fn default_feed_file_name() -> String {
    "utah-dev-events.ics".to_string()
}
fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_language() -> String {
    "en-us".to_string()
}
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.name().to_string()
}
fn default_retention_days() -> u32 {
    RetentionWindow::DEFAULT_FEED_DAYS
}
fn default_ingestion_interval() -> u64 {
    360
}
fn default_max_events_per_group() -> usize {
    3
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; CommunityCalendarBot/1.0)".to_string()
}
fn default_scrape_timeout() -> u64 {
    20
}

/// A loaded value that cannot be used.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration `{key}`: {reason}")]
pub struct ConfigValidationError {
    pub key: &'static str,
    pub reason: String,
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError {
        key,
        reason: reason.into(),
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CC__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CC")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests never depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 2
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 10
            admin_api_key_hash = ""

            [feeds]
            calendar_name = "Utah Dev Events"
            timezone = "America/Denver"
            retention_days = 7

            [ingestion]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        let db = &self.database;
        if db.url.is_empty() {
            return Err(invalid("database.url", "must be set, usually via CC__DATABASE__URL"));
        }
        if db.min_connections > db.max_connections {
            return Err(invalid("database.min_connections", "cannot exceed max_connections"));
        }
        if self.server.port == 0 {
            return Err(invalid("server.port", "cannot be 0"));
        }
        if self.feeds.timezone.parse::<Tz>().is_err() {
            return Err(invalid(
                "feeds.timezone",
                format!("unknown zone {:?}", self.feeds.timezone),
            ));
        }
        if self.feeds.retention_days > 365 {
            return Err(invalid("feeds.retention_days", "cannot exceed 365"));
        }
        if self.ingestion.enabled && self.ingestion.interval_minutes == 0 {
            return Err(invalid("ingestion.interval_minutes", "must be positive when enabled"));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
