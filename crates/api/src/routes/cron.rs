use axum::routing::get;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Routes mounted at `/cron`. Authenticated by the cron secret in production.
///
/// ```text
/// GET /check-bets   -> check_bets
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check-bets", get(cron::check_bets))
}
