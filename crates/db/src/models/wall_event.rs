use habitstake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A wall event joined with its author's profile and the bet it refers to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WallFeedItem {
    pub id: DbId,
    pub event_type: String,
    pub user_id: Option<DbId>,
    pub bet_id: Option<DbId>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub display_name: Option<String>,
    pub avatar_emoji: Option<String>,
    pub bet_owner_id: Option<DbId>,
    pub bet_status: Option<String>,
    pub bet_created_at: Option<Timestamp>,
}
