//! Liveness, readiness, and full health endpoints.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub ingestion_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    /// Round-trip time of the probe query, absent when it failed.
    pub latency_ms: Option<u64>,
}

impl DatabaseHealth {
    async fn probe(pool: &PgPool) -> Self {
        let started = Instant::now();
        let connected = persistence::db::ping(pool).await.is_ok();
        Self::from_probe(connected, started.elapsed().as_millis() as u64)
    }

    fn from_probe(connected: bool, latency_ms: u64) -> Self {
        Self {
            connected,
            latency_ms: connected.then_some(latency_ms),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = DatabaseHealth::probe(&state.pool).await;
    let (code, status) = if database.connected {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        ingestion_enabled: state.config.ingestion.enabled,
    };
    (code, Json(body))
}

/// GET /api/health/live
pub async fn live() -> Json<ProbeResponse> {
    Json(ProbeResponse { status: "alive" })
}

/// GET /api/health/ready. 503 until the database answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeResponse>, StatusCode> {
    match persistence::db::ping(&state.pool).await {
        Ok(()) => Ok(Json(ProbeResponse { status: "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
