use axum::routing::get;
use axum::Router;

use crate::handlers::wall;
use crate::state::AppState;

/// Routes mounted at `/wall`.
///
/// ```text
/// GET /   -> list_wall (public; ?limit, offset)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(wall::list_wall))
}
