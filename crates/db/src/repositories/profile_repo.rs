//! Repository for the `profiles` table (read side).
//!
//! Profiles are created and their balances changed only through
//! [`LedgerRepo`](super::LedgerRepo).

use habitstake_core::types::DbId;
use sqlx::PgPool;

use super::PROFILE_COLUMNS;
use crate::models::profile::Profile;

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a profile by (already normalized) email address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
