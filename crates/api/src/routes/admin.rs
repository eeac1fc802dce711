//! Admin routes, guarded by the admin API key.

use axum::{extract::State, Json};
use domain::models::IngestionSummary;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::IngestionError;

/// Run an ingestion pass now and return its totals.
///
/// POST /api/v1/admin/ingestion/run
pub async fn run_ingestion(State(state): State<AppState>) -> Result<Json<IngestionSummary>, ApiError> {
    info!("Manual ingestion run requested");
    let summary = state.ingestion.run().await.map_err(|e| match e {
        IngestionError::AlreadyRunning => ApiError::Conflict("Ingestion is already running".into()),
        IngestionError::Database(db) => ApiError::from(db),
    })?;
    Ok(Json(summary))
}
