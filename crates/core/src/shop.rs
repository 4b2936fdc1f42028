//! Cosmetic shop rules for avatars and collectibles.

use crate::error::CoreError;
use crate::types::DbId;

/// Premium avatars are never sold for coins.
pub fn ensure_avatar_for_sale(avatar_id: DbId, is_premium: bool) -> Result<(), CoreError> {
    if is_premium {
        return Err(CoreError::Forbidden(format!(
            "Avatar {avatar_id} is not for sale"
        )));
    }
    Ok(())
}

/// Reject buying an item the user already owns.
pub fn ensure_not_owned(item: &str, item_id: DbId, owned: bool) -> Result<(), CoreError> {
    if owned {
        return Err(CoreError::Conflict(format!(
            "You already own {item} {item_id}"
        )));
    }
    Ok(())
}

/// Only owned avatars can be made active.
pub fn ensure_owned_avatar(avatar_id: DbId, owned: bool) -> Result<(), CoreError> {
    if !owned {
        return Err(CoreError::Forbidden(format!(
            "You don't own avatar {avatar_id}"
        )));
    }
    Ok(())
}
