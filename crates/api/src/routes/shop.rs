//! Route definitions for the cosmetic shop.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::shop;
use crate::state::AppState;

/// Routes mounted at `/shop`. All require auth.
///
/// ```text
/// GET  /avatars                      -> list_avatars
/// POST /avatars/{id}/purchase        -> purchase_avatar
/// POST /avatars/{id}/activate        -> activate_avatar
/// GET  /collectibles                 -> list_collectibles
/// POST /collectibles/{id}/purchase   -> purchase_collectible
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/avatars", get(shop::list_avatars))
        .route("/avatars/{id}/purchase", post(shop::purchase_avatar))
        .route("/avatars/{id}/activate", post(shop::activate_avatar))
        .route("/collectibles", get(shop::list_collectibles))
        .route(
            "/collectibles/{id}/purchase",
            post(shop::purchase_collectible),
        )
}
