//! Authentication for scheduler-triggered endpoints.
//!
//! In production the caller must send `Authorization: Bearer <CRON_SECRET>`.
//! Outside production every caller is accepted so the sweep can be triggered
//! by hand. A production server without `CRON_SECRET` rejects every call.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// Marker extractor for an accepted cron caller.
#[derive(Debug, Clone, Copy)]
pub struct CronCaller;

/// Rejection for [`CronCaller`]: `401 {"error": "Unauthorized"}`.
#[derive(Debug)]
pub struct CronUnauthorized;

impl IntoResponse for CronUnauthorized {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
    }
}

impl FromRequestParts<AppState> for CronCaller {
    type Rejection = CronUnauthorized;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.is_production() {
            return Ok(CronCaller);
        }

        let Some(secret) = state.config.cron_secret.as_deref() else {
            tracing::warn!("Cron call rejected: CRON_SECRET is not configured");
            return Err(CronUnauthorized);
        };

        match bearer_token(parts) {
            Some(token) if token == secret => Ok(CronCaller),
            _ => {
                tracing::warn!("Cron call rejected: bad or missing secret");
                Err(CronUnauthorized)
            }
        }
    }
}
