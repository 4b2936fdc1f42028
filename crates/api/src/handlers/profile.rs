//! Handlers for the authenticated user's own profile.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use habitstake_core::bet::win_rate_percent;
use habitstake_core::error::CoreError;
use habitstake_core::pagination::{clamp_limit, clamp_offset};
use habitstake_core::types::Coins;
use habitstake_db::models::bet::BetStats;
use habitstake_db::models::coin_ledger::CoinLedgerEntry;
use habitstake_db::models::cosmetic::{OwnedAvatar, OwnedCollectible};
use habitstake_db::models::profile::Profile;
use habitstake_db::repositories::{
    BetRepo, CoinLedgerRepo, CosmeticRepo, LedgerRepo, ProfileRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the coin history.
const DEFAULT_LEDGER_LIMIT: i64 = 50;

/// Largest page of coin history served at once.
const MAX_LEDGER_LIMIT: i64 = 200;

/// Response for `POST /api/profile/login-bonus`.
#[derive(Debug, Serialize)]
pub struct LoginBonusResponse {
    /// Coins credited by this call; `0` if already claimed today.
    pub credited: Coins,
    pub balance: Coins,
}

/// Response for `GET /api/profile/stats`.
#[derive(Debug, Serialize)]
pub struct ProfileStats {
    #[serde(flatten)]
    pub bets: BetStats,
    /// Won share of resolved bets, in whole percent.
    pub win_rate: i64,
    pub avatars: Vec<OwnedAvatar>,
    pub collectibles: Vec<OwnedCollectible>,
}

/// GET /api/profile
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = find_profile(&state, user).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/profile/login-bonus
///
/// Claim the daily login bonus. Safe to call on every app open.
pub async fn claim_login_bonus(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LoginBonusResponse>>> {
    let credited = LedgerRepo::claim_login_bonus(&state.pool, user.user_id, Utc::now()).await?;
    let profile = find_profile(&state, user).await?;

    if credited > 0 {
        tracing::info!(user_id = user.user_id, credited, "Login bonus credited");
    }

    Ok(Json(DataResponse {
        data: LoginBonusResponse {
            credited,
            balance: profile.balance,
        },
    }))
}

/// GET /api/profile/ledger
///
/// The user's coin history, newest first.
pub async fn list_ledger(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CoinLedgerEntry>>>> {
    let entries = CoinLedgerRepo::list_for_profile(
        &state.pool,
        user.user_id,
        clamp_limit(params.limit, DEFAULT_LEDGER_LIMIT, MAX_LEDGER_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/profile/stats
///
/// Bet record and owned cosmetics.
pub async fn get_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProfileStats>>> {
    let bets = BetRepo::stats_for_user(&state.pool, user.user_id).await?;
    let avatars = CosmeticRepo::list_owned_avatars(&state.pool, user.user_id).await?;
    let collectibles = CosmeticRepo::list_owned_collectibles(&state.pool, user.user_id).await?;

    Ok(Json(DataResponse {
        data: ProfileStats {
            win_rate: win_rate_percent(bets.won, bets.lost),
            bets,
            avatars,
            collectibles,
        },
    }))
}

async fn find_profile(state: &AppState, user: AuthUser) -> AppResult<Profile> {
    ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))
}
