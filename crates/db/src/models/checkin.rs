use habitstake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `checkins` table. One row per (bet, week).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Checkin {
    pub id: DbId,
    pub bet_id: DbId,
    pub week_number: i32,
    pub completed: bool,
    pub checked_in_at: Option<Timestamp>,
    pub buddy_notified: bool,
    pub created_at: Timestamp,
}
