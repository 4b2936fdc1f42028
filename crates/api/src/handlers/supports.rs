//! Handlers for supporting (co-staking on) another user's bet.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use habitstake_core::support::{check_eligibility, rejection_reason, SupportCheck};
use habitstake_core::types::DbId;
use habitstake_db::models::support::{CreateSupport, Support};
use habitstake_db::repositories::{LedgerRepo, SupportRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::bets::find_bet;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `GET /bets/{id}/support`.
#[derive(Debug, Serialize)]
pub struct SupportEligibility {
    pub can_support: bool,
    /// Why the user cannot support the bet, when they cannot.
    pub reason: Option<String>,
}

/// GET /api/bets/{id}/support
///
/// Whether the authenticated user may support this bet right now. Balance is
/// not considered; it is checked when the support is placed.
pub async fn get_eligibility(
    user: AuthUser,
    State(state): State<AppState>,
    Path(bet_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SupportEligibility>>> {
    let bet = find_bet(&state, bet_id).await?;
    let existing = SupportRepo::find_for_supporter(&state.pool, bet_id, user.user_id).await?;

    let check = SupportCheck {
        bet_owner_id: bet.user_id,
        bet_status: bet.parsed_status()?,
        bet_created_at: bet.created_at,
        supporter_id: user.user_id,
        already_supporting: existing.is_some(),
    };

    let data = match check_eligibility(&check, Utc::now()) {
        Ok(()) => SupportEligibility {
            can_support: true,
            reason: None,
        },
        Err(e) => SupportEligibility {
            can_support: false,
            reason: Some(rejection_reason(&e)),
        },
    };

    Ok(Json(DataResponse { data }))
}

/// POST /api/bets/{id}/support
///
/// Stake coins on someone else's bet.
pub async fn support_bet(
    user: AuthUser,
    State(state): State<AppState>,
    Path(bet_id): Path<DbId>,
    Json(input): Json<CreateSupport>,
) -> AppResult<(StatusCode, Json<DataResponse<Support>>)> {
    let support = LedgerRepo::support_bet(
        &state.pool,
        user.user_id,
        bet_id,
        input.stake_amount,
        Utc::now(),
    )
    .await?;

    tracing::info!(
        support_id = support.id,
        bet_id,
        supporter_id = user.user_id,
        stake = support.stake_amount,
        "Support placed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: support })))
}
