//! Repository for the `checkins` table (read side).

use habitstake_core::types::DbId;
use sqlx::PgPool;

use super::CHECKIN_COLUMNS;
use crate::models::checkin::Checkin;

pub struct CheckinRepo;

impl CheckinRepo {
    /// All check-in rows of a bet in week order.
    pub async fn list_for_bet(pool: &PgPool, bet_id: DbId) -> Result<Vec<Checkin>, sqlx::Error> {
        let query =
            format!("SELECT {CHECKIN_COLUMNS} FROM checkins WHERE bet_id = $1 ORDER BY week_number");
        sqlx::query_as::<_, Checkin>(&query)
            .bind(bet_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_week(
        pool: &PgPool,
        bet_id: DbId,
        week_number: i32,
    ) -> Result<Option<Checkin>, sqlx::Error> {
        let query = format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkins WHERE bet_id = $1 AND week_number = $2"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(bet_id)
            .bind(week_number)
            .fetch_optional(pool)
            .await
    }
}
