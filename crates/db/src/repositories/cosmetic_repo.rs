//! Repository for the `avatars` and `collectibles` catalogs and their
//! ownership join tables (read side).

use habitstake_core::types::DbId;
use sqlx::PgPool;

use crate::models::cosmetic::{
    AvatarListing, CollectibleListing, OwnedAvatar, OwnedCollectible,
};

/// Column list for `avatars` queries.
pub(crate) const AVATAR_COLUMNS: &str = "\
    id, emoji, name, category, price, personality_voice, is_premium, \
    encouragement_messages, created_at";

pub struct CosmeticRepo;

impl CosmeticRepo {
    /// The avatar shop for one user: every non-premium avatar, with ownership
    /// and active flags, ordered by category then price.
    pub async fn list_avatar_listings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AvatarListing>, sqlx::Error> {
        sqlx::query_as::<_, AvatarListing>(
            "SELECT a.id, a.emoji, a.name, a.category, a.price, a.personality_voice, \
                    (ua.user_id IS NOT NULL) AS owned, \
                    (p.active_avatar_id IS NOT DISTINCT FROM a.id) AS active \
             FROM avatars a \
             LEFT JOIN user_avatars ua ON ua.avatar_id = a.id AND ua.user_id = $1 \
             LEFT JOIN profiles p ON p.id = $1 \
             WHERE a.is_premium = FALSE \
             ORDER BY a.category, a.price, a.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// The collectibles shop for one user, ordered by tier then price.
    pub async fn list_collectible_listings(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CollectibleListing>, sqlx::Error> {
        sqlx::query_as::<_, CollectibleListing>(
            "SELECT c.id, c.emoji, c.name, c.tier, c.price, \
                    (uc.user_id IS NOT NULL) AS owned \
             FROM collectibles c \
             LEFT JOIN user_collectibles uc ON uc.collectible_id = c.id AND uc.user_id = $1 \
             ORDER BY c.tier, c.price, c.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Avatars a user owns, most recently acquired first.
    pub async fn list_owned_avatars(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<OwnedAvatar>, sqlx::Error> {
        sqlx::query_as::<_, OwnedAvatar>(
            "SELECT a.id, a.emoji, a.name, a.category, ua.acquired_at \
             FROM user_avatars ua \
             JOIN avatars a ON a.id = ua.avatar_id \
             WHERE ua.user_id = $1 \
             ORDER BY ua.acquired_at DESC, a.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Collectibles a user owns, most recently acquired first.
    pub async fn list_owned_collectibles(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<OwnedCollectible>, sqlx::Error> {
        sqlx::query_as::<_, OwnedCollectible>(
            "SELECT c.id, c.emoji, c.name, c.tier, uc.acquired_at \
             FROM user_collectibles uc \
             JOIN collectibles c ON c.id = uc.collectible_id \
             WHERE uc.user_id = $1 \
             ORDER BY uc.acquired_at DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
