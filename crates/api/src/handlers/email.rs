//! Accountability-buddy email.
//!
//! `POST /api/email/buddy` sends the check-in email on demand and answers
//! with flat `{ "success", "messageId" }` / `{ "error" }` bodies. The same
//! sending path is used in the background after a check-in with
//! `notify_buddy` set.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use habitstake_core::types::DbId;
use habitstake_db::models::bet::Bet;
use habitstake_db::repositories::{BetRepo, ProfileRepo};
use habitstake_notify::buddy::{self, BuddyCheckin};
use habitstake_notify::MailError;
use serde::Deserialize;
use serde_json::json;

use crate::middleware::auth::AuthUser;
use crate::state::{AppState, MailHandle};

/// Request body for `POST /api/email/buddy`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuddyEmailRequest {
    pub bet_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// POST /api/email/buddy
///
/// Email the bet's buddy about the owner's latest check-in. Only the bet's
/// owner may trigger it, and `userId` must be the caller.
pub async fn send_buddy(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BuddyEmailRequest>,
) -> Response {
    let Some(mail) = state.mail.as_ref() else {
        tracing::error!("Buddy email requested but no mail provider is configured");
        return failure(StatusCode::SERVICE_UNAVAILABLE, "Email service not configured");
    };

    let (Some(bet_id), Some(user_id)) = (input.bet_id, input.user_id) else {
        return failure(StatusCode::BAD_REQUEST, "Missing betId or userId");
    };

    let bet = match BetRepo::find_by_id(&state.pool, bet_id).await {
        Ok(Some(bet)) => bet,
        Ok(None) => return failure(StatusCode::NOT_FOUND, "Bet not found"),
        Err(e) => {
            tracing::error!(bet_id, error = %e, "Buddy email: bet lookup failed");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    if bet.user_id != user_id || user_id != user.user_id {
        return failure(StatusCode::FORBIDDEN, "Unauthorized");
    }

    if bet.buddy_email.is_none() {
        return failure(
            StatusCode::BAD_REQUEST,
            "No buddy email configured for this bet",
        );
    }

    match send_buddy_email(&state, mail, &bet).await {
        Ok(message_id) => Json(json!({ "success": true, "messageId": message_id })).into_response(),
        Err(e) => {
            tracing::error!(bet_id, error = %e, "Buddy email: send failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send email")
        }
    }
}

/// Send the buddy email for `bet` in a background task.
///
/// Does nothing when no mail provider is configured.
pub(crate) fn spawn_buddy_email(state: &AppState, bet: Bet) {
    let Some(mail) = state.mail.clone() else {
        tracing::debug!(bet_id = bet.id, "Buddy email skipped: mail not configured");
        return;
    };
    let state = state.clone();

    tokio::spawn(async move {
        match send_buddy_email(&state, &mail, &bet).await {
            Ok(message_id) => {
                tracing::info!(bet_id = bet.id, %message_id, "Buddy email sent");
            }
            Err(e) => {
                tracing::warn!(bet_id = bet.id, error = %e, "Buddy email failed");
            }
        }
    });
}

#[derive(Debug, thiserror::Error)]
enum BuddyEmailError {
    #[error("bet has no buddy email")]
    NoRecipient,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Render and deliver the buddy email for `bet`. Returns the message id.
async fn send_buddy_email(
    state: &AppState,
    mail: &MailHandle,
    bet: &Bet,
) -> Result<String, BuddyEmailError> {
    let to = bet
        .buddy_email
        .as_deref()
        .ok_or(BuddyEmailError::NoRecipient)?;
    let owner = ProfileRepo::find_by_id(&state.pool, bet.user_id).await?;

    let email = buddy::render(
        &BuddyCheckin {
            owner_name: owner.as_ref().and_then(|p| p.display_name.as_deref()),
            relationship: bet.buddy_relationship.as_deref(),
            habit: &bet.habit_description,
            current_week: bet.current_week,
            duration_weeks: bet.duration_weeks,
        },
        &mail.from,
        to,
        &state.config.app_url,
    );

    Ok(mail.mailer.send(&email).await?)
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
