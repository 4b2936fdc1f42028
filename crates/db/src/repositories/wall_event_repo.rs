//! Repository for the append-only `wall_events` feed (read side).

use sqlx::PgPool;

use crate::models::wall_event::WallFeedItem;

pub struct WallEventRepo;

impl WallEventRepo {
    /// Newest wall events first, joined with author profile, active avatar
    /// and the referenced bet.
    pub async fn list_feed(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WallFeedItem>, sqlx::Error> {
        sqlx::query_as::<_, WallFeedItem>(
            "SELECT w.id, w.event_type, w.user_id, w.bet_id, w.metadata, w.created_at, \
                    p.display_name, a.emoji AS avatar_emoji, \
                    b.user_id AS bet_owner_id, b.status AS bet_status, \
                    b.created_at AS bet_created_at \
             FROM wall_events w \
             LEFT JOIN profiles p ON p.id = w.user_id \
             LEFT JOIN avatars a ON a.id = p.active_avatar_id \
             LEFT JOIN bets b ON b.id = w.bet_id \
             ORDER BY w.created_at DESC, w.id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
