//! Handlers for the cosmetic shop (avatars and collectibles).

use axum::extract::{Path, State};
use axum::Json;
use habitstake_core::types::DbId;
use habitstake_db::models::cosmetic::{AvatarListing, CollectibleListing};
use habitstake_db::models::profile::Profile;
use habitstake_db::repositories::{CosmeticRepo, LedgerRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Avatars
// ---------------------------------------------------------------------------

/// GET /api/shop/avatars
///
/// Purchasable avatars with the caller's `owned` / `active` flags. Premium
/// avatars are not listed.
pub async fn list_avatars(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AvatarListing>>>> {
    let avatars = CosmeticRepo::list_avatar_listings(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: avatars }))
}

/// POST /api/shop/avatars/{id}/purchase
pub async fn purchase_avatar(
    user: AuthUser,
    State(state): State<AppState>,
    Path(avatar_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = LedgerRepo::purchase_avatar(&state.pool, user.user_id, avatar_id).await?;

    tracing::info!(
        user_id = user.user_id,
        avatar_id,
        balance = profile.balance,
        "Avatar purchased"
    );

    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/shop/avatars/{id}/activate
///
/// Make an owned avatar the active one.
pub async fn activate_avatar(
    user: AuthUser,
    State(state): State<AppState>,
    Path(avatar_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = LedgerRepo::set_active_avatar(&state.pool, user.user_id, avatar_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Collectibles
// ---------------------------------------------------------------------------

/// GET /api/shop/collectibles
pub async fn list_collectibles(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CollectibleListing>>>> {
    let items = CosmeticRepo::list_collectible_listings(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/shop/collectibles/{id}/purchase
pub async fn purchase_collectible(
    user: AuthUser,
    State(state): State<AppState>,
    Path(collectible_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile =
        LedgerRepo::purchase_collectible(&state.pool, user.user_id, collectible_id).await?;

    tracing::info!(
        user_id = user.user_id,
        collectible_id,
        balance = profile.balance,
        "Collectible purchased"
    );

    Ok(Json(DataResponse { data: profile }))
}
