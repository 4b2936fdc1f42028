//! Handlers for the `/bets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use habitstake_core::bet::{win_payout, BetStatus};
use habitstake_core::deadline::week_deadline;
use habitstake_core::error::CoreError;
use habitstake_core::pagination::{clamp_limit, clamp_offset};
use habitstake_core::types::{Coins, DbId, Timestamp};
use habitstake_db::models::bet::{Bet, CheckinOutcome, CreateBet};
use habitstake_db::models::checkin::Checkin;
use habitstake_db::models::support::Support;
use habitstake_db::repositories::{BetRepo, CheckinRepo, LedgerRepo, SupportRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::email::spawn_buddy_email;
use crate::middleware::auth::AuthUser;
use crate::query::BetListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for bet listings.
const DEFAULT_BET_LIMIT: i64 = 50;

/// Largest page of bets served at once.
const MAX_BET_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /bets/{id}/checkin`.
#[derive(Debug, Default, Deserialize)]
pub struct CheckinRequest {
    /// Email the bet's buddy about this check-in.
    #[serde(default)]
    pub notify_buddy: bool,
}

/// A bet with its weekly rows, supports and derived figures.
#[derive(Debug, Serialize)]
pub struct BetDetail {
    pub bet: Bet,
    pub checkins: Vec<Checkin>,
    pub supports: Vec<Support>,
    /// Owner payout if the bet is won.
    pub payout_preview: Coins,
    /// Check-in deadline of the current week; `None` once resolved.
    pub current_deadline: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/bets
///
/// The authenticated user's bets, newest first. Optional `?status=` filter.
pub async fn list_bets(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BetListParams>,
) -> AppResult<Json<DataResponse<Vec<Bet>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<BetStatus>)
        .transpose()?;

    let bets = BetRepo::list_for_user(
        &state.pool,
        user.user_id,
        status.map(BetStatus::as_str),
        clamp_limit(params.limit, DEFAULT_BET_LIMIT, MAX_BET_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;

    Ok(Json(DataResponse { data: bets }))
}

/// POST /api/bets
///
/// Create a bet and escrow its stake.
pub async fn create_bet(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBet>,
) -> AppResult<(StatusCode, Json<DataResponse<Bet>>)> {
    let bet = LedgerRepo::create_bet(&state.pool, user.user_id, &input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bet })))
}

/// GET /api/bets/{id}
///
/// Any signed-in user may view a bet; supporters reach bets from the wall.
pub async fn get_bet(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(bet_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BetDetail>>> {
    let bet = find_bet(&state, bet_id).await?;
    let checkins = CheckinRepo::list_for_bet(&state.pool, bet_id).await?;
    let supports = SupportRepo::list_for_bet(&state.pool, bet_id).await?;

    let current_deadline = match bet.parsed_status()? {
        BetStatus::Active => Some(week_deadline(bet.started_at, bet.current_week)),
        BetStatus::Won | BetStatus::Lost => None,
    };

    Ok(Json(DataResponse {
        data: BetDetail {
            payout_preview: win_payout(bet.stake_amount, bet.duration_weeks),
            current_deadline,
            bet,
            checkins,
            supports,
        },
    }))
}

/// POST /api/bets/{id}/checkin
///
/// Complete the current week. When `notify_buddy` is set and the bet has a
/// buddy email, the buddy is emailed in the background; delivery failures do
/// not affect the check-in.
pub async fn checkin(
    user: AuthUser,
    State(state): State<AppState>,
    Path(bet_id): Path<DbId>,
    body: Option<Json<CheckinRequest>>,
) -> AppResult<Json<DataResponse<CheckinOutcome>>> {
    let Json(input) = body.unwrap_or_default();

    let outcome =
        LedgerRepo::checkin_week(&state.pool, user.user_id, bet_id, input.notify_buddy, Utc::now())
            .await?;

    tracing::info!(
        bet_id,
        user_id = user.user_id,
        week = outcome.completed_week,
        won = outcome.won,
        "Check-in recorded"
    );

    if outcome.checkin.buddy_notified {
        spawn_buddy_email(&state, outcome.bet.clone());
    }

    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_bet(state: &AppState, bet_id: DbId) -> AppResult<Bet> {
    BetRepo::find_by_id(&state.pool, bet_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Bet",
            id: bet_id,
        }))
}
