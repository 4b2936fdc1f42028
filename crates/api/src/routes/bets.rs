//! Route definitions for bets, check-ins and supports.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bets, supports};
use crate::state::AppState;

/// Routes mounted at `/bets`. All require auth.
///
/// ```text
/// GET  /                -> list_bets (?status, limit, offset)
/// POST /                -> create_bet
/// GET  /{id}            -> get_bet
/// POST /{id}/checkin    -> checkin
/// GET  /{id}/support    -> get_eligibility
/// POST /{id}/support    -> support_bet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bets::list_bets).post(bets::create_bet))
        .route("/{id}", get(bets::get_bet))
        .route("/{id}/checkin", post(bets::checkin))
        .route(
            "/{id}/support",
            get(supports::get_eligibility).post(supports::support_bet),
        )
}
