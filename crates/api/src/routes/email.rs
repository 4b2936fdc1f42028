use axum::routing::post;
use axum::Router;

use crate::handlers::email;
use crate::state::AppState;

/// Routes mounted at `/email`.
///
/// ```text
/// POST /buddy   -> send_buddy (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/buddy", post(email::send_buddy))
}
