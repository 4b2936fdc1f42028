//! Repository for the `supports` table (read side).

use habitstake_core::types::DbId;
use sqlx::PgPool;

use super::SUPPORT_COLUMNS;
use crate::models::support::Support;

pub struct SupportRepo;

impl SupportRepo {
    pub async fn list_for_bet(pool: &PgPool, bet_id: DbId) -> Result<Vec<Support>, sqlx::Error> {
        let query = format!(
            "SELECT {SUPPORT_COLUMNS} FROM supports WHERE bet_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Support>(&query)
            .bind(bet_id)
            .fetch_all(pool)
            .await
    }

    /// The support a given user placed on a bet, if any.
    pub async fn find_for_supporter(
        pool: &PgPool,
        bet_id: DbId,
        supporter_id: DbId,
    ) -> Result<Option<Support>, sqlx::Error> {
        let query = format!(
            "SELECT {SUPPORT_COLUMNS} FROM supports WHERE bet_id = $1 AND supporter_id = $2"
        );
        sqlx::query_as::<_, Support>(&query)
            .bind(bet_id)
            .bind(supporter_id)
            .fetch_optional(pool)
            .await
    }
}
