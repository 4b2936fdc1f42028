use habitstake_core::types::{Coins, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `coin_ledger` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoinLedgerEntry {
    pub id: DbId,
    pub profile_id: DbId,
    pub delta: Coins,
    pub reason: String,
    pub bet_id: Option<DbId>,
    pub created_at: Timestamp,
}
