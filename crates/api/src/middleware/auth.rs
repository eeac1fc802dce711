//! Admin authentication middleware.
//!
//! Admin routes require an `X-API-Key` header whose SHA-256 digest matches
//! `security.admin_api_key_hash`. With no hash configured they are closed.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::crypto::key_matches_hash;

use crate::app::AppState;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware for admin-only routes.
pub async fn require_admin(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented.is_empty()
        || !key_matches_hash(presented, &state.config.security.admin_api_key_hash)
    {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request");
        return ApiError::Unauthorized("Invalid or missing API key".into()).into_response();
    }

    next.run(req).await
}
