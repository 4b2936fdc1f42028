//! Handler for the public wall feed.

use axum::extract::{Query, State};
use axum::Json;
use habitstake_core::pagination::{clamp_limit, clamp_offset};
use habitstake_core::wall::{DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
use habitstake_db::models::wall_event::WallFeedItem;
use habitstake_db::repositories::WallEventRepo;

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/wall
///
/// Latest wall events, newest first, with author and bet details. Public.
pub async fn list_wall(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<WallFeedItem>>>> {
    let events = WallEventRepo::list_feed(
        &state.pool,
        clamp_limit(params.limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: events }))
}
