use habitstake_core::types::{Coins, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `supports` table.
///
/// `payout_amount` stays `NULL` until the bet resolves: the winning amount
/// when it is won, `0` when it is lost.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Support {
    pub id: DbId,
    pub bet_id: DbId,
    pub supporter_id: DbId,
    pub stake_amount: Coins,
    pub payout_amount: Option<Coins>,
    pub created_at: Timestamp,
}

/// Request body for supporting a bet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupport {
    pub stake_amount: Coins,
}
