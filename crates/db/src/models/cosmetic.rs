//! Avatar and collectible catalog models.

use habitstake_core::types::{Coins, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `avatars` catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Avatar {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub category: String,
    pub price: Coins,
    pub personality_voice: Option<String>,
    pub is_premium: bool,
    pub encouragement_messages: Option<Vec<String>>,
    pub created_at: Timestamp,
}

/// An avatar as shown in the shop, with the viewer's ownership flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvatarListing {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub category: String,
    pub price: Coins,
    pub personality_voice: Option<String>,
    pub owned: bool,
    pub active: bool,
}

/// A row from the `collectibles` catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collectible {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub tier: String,
    pub price: Coins,
    pub created_at: Timestamp,
}

/// A collectible as shown in the shop, with the viewer's ownership flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollectibleListing {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub tier: String,
    pub price: Coins,
    pub owned: bool,
}

/// An avatar in a user's inventory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnedAvatar {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub category: String,
    pub acquired_at: Timestamp,
}

/// A collectible in a user's inventory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnedCollectible {
    pub id: DbId,
    pub emoji: String,
    pub name: String,
    pub tier: String,
    pub acquired_at: Timestamp,
}
