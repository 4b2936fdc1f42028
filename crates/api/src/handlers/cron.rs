//! Scheduler-triggered endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::background::deadline_sweep;
use crate::middleware::cron::CronCaller;
use crate::state::AppState;

/// GET /api/cron/check-bets
///
/// Run the deadline sweep once. Intended to be called daily by an external
/// scheduler.
pub async fn check_bets(_caller: CronCaller, State(state): State<AppState>) -> Response {
    match deadline_sweep::sweep_once(&state.pool, Utc::now()).await {
        Ok(report) => Json(json!({
            "success": true,
            "message": report.message(),
            "processed": report.processed,
            "lost": report.lost,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Cron check-bets failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process bets" })),
            )
                .into_response()
        }
    }
}
