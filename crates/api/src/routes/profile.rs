//! Route definitions for the authenticated user's own profile.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`. All require auth.
///
/// ```text
/// GET  /             -> get_profile
/// POST /login-bonus  -> claim_login_bonus
/// GET  /ledger       -> list_ledger
/// GET  /stats        -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_profile))
        .route("/login-bonus", post(profile::claim_login_bonus))
        .route("/ledger", get(profile::list_ledger))
        .route("/stats", get(profile::get_stats))
}
