//! Daily login bonus rule.

use crate::types::{Coins, Timestamp};

/// Coins credited by one daily login bonus claim.
pub const LOGIN_BONUS: Coins = 200;

/// Whether a bonus may be claimed at `now` given the previous claim time.
///
/// One claim per UTC calendar day.
pub fn bonus_available(last_claimed_at: Option<Timestamp>, now: Timestamp) -> bool {
    match last_claimed_at {
        Some(last) => last.date_naive() != now.date_naive(),
        None => true,
    }
}
