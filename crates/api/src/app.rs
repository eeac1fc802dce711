use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, trace_id,
    RateLimiterState,
};
use crate::routes::{admin, events, feeds, groups, health, tags};
use crate::services::IngestionService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub ingestion: Arc<IngestionService>,
}

fn api_cors(config: &Config) -> CorsLayer {
    let origins = &config.security.cors_origins;
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Calendar clients subscribe from anywhere.
fn feed_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(config: Config, pool: PgPool, ingestion: Arc<IngestionService>) -> Router {
    let config = Arc::new(config);

    // Submissions are only limited when rate_limit_per_minute > 0
    let rate_limiter = (config.security.rate_limit_per_minute > 0)
        .then(|| Arc::new(RateLimiterState::new(config.security.rate_limit_per_minute)));

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        ingestion,
    };

    let rate_limited = middleware::from_fn_with_state(state.clone(), rate_limit_middleware);

    // Feed routes: GET only (HEAD implied), everything else is 405
    let feed_routes = Router::new()
        .route(feeds::ICAL_PATH, get(feeds::ical_feed))
        .route(feeds::RSS_PATH, get(feeds::rss_feed))
        .route("/api/v1/feeds/links", get(feeds::links))
        .layer(feed_cors());

    let api_routes = Router::new()
        .route(
            "/api/v1/events",
            get(events::list_events).post(events::submit_event.layer(rate_limited.clone())),
        )
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route(
            "/api/v1/groups",
            get(groups::list_groups).post(groups::submit_group.layer(rate_limited)),
        )
        .route("/api/v1/tags", get(tags::list_tags))
        .layer(api_cors(&config));

    let admin_routes = Router::new()
        .route("/api/v1/admin/ingestion/run", post(admin::run_ingestion))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(feed_routes)
        .merge(api_routes)
        .merge(admin_routes)
        // Outermost first: request id, tracing, metrics, timeout, compression.
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace_id))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
