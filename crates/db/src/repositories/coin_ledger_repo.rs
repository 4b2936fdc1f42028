//! Repository for the append-only `coin_ledger` table (read side).

use habitstake_core::types::{Coins, DbId};
use sqlx::PgPool;

use crate::models::coin_ledger::CoinLedgerEntry;

pub struct CoinLedgerRepo;

impl CoinLedgerRepo {
    /// A profile's ledger entries, newest first.
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CoinLedgerEntry>, sqlx::Error> {
        sqlx::query_as::<_, CoinLedgerEntry>(
            "SELECT id, profile_id, delta, reason, bet_id, created_at \
             FROM coin_ledger WHERE profile_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(profile_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Sum of all deltas for a profile. Always equals its balance.
    pub async fn sum_for_profile(pool: &PgPool, profile_id: DbId) -> Result<Coins, sqlx::Error> {
        sqlx::query_scalar::<_, Coins>(
            "SELECT COALESCE(SUM(delta), 0)::BIGINT FROM coin_ledger WHERE profile_id = $1",
        )
        .bind(profile_id)
        .fetch_one(pool)
        .await
    }
}
