//! Repository for the `bets` table (read side).

use habitstake_core::types::DbId;
use sqlx::PgPool;

use super::BET_COLUMNS;
use crate::models::bet::{Bet, BetStats};

pub struct BetRepo;

impl BetRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bet>, sqlx::Error> {
        let query = format!("SELECT {BET_COLUMNS} FROM bets WHERE id = $1");
        sqlx::query_as::<_, Bet>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's bets, newest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Bet>, sqlx::Error> {
        let query = format!(
            "SELECT {BET_COLUMNS} FROM bets \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Bet>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Bet counts by status and won/lost coin totals for one user.
    pub async fn stats_for_user(pool: &PgPool, user_id: DbId) -> Result<BetStats, sqlx::Error> {
        sqlx::query_as::<_, BetStats>(
            "SELECT \
                COUNT(*) FILTER (WHERE status = 'active') AS active, \
                COUNT(*) FILTER (WHERE status = 'won') AS won, \
                COUNT(*) FILTER (WHERE status = 'lost') AS lost, \
                COALESCE(SUM(stake_amount * duration_weeks) FILTER (WHERE status = 'won'), 0)::BIGINT \
                    AS total_won, \
                COALESCE(SUM(stake_amount) FILTER (WHERE status = 'lost'), 0)::BIGINT AS total_lost \
             FROM bets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// All bets still in the `active` status, oldest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Bet>, sqlx::Error> {
        let query = format!(
            "SELECT {BET_COLUMNS} FROM bets WHERE status = 'active' ORDER BY started_at, id"
        );
        sqlx::query_as::<_, Bet>(&query).fetch_all(pool).await
    }
}
