//! Support (co-stake) eligibility.
//!
//! A user may back someone else's bet while it is active and younger than
//! [`SUPPORT_WINDOW_DAYS`], at most once per bet. Supporters win
//! `stake * duration_weeks` when the bet is won and forfeit their stake when
//! it is lost.

use chrono::Duration;

use crate::bet::BetStatus;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Bets older than this many days no longer accept supporters.
pub const SUPPORT_WINDOW_DAYS: i64 = 14;

/// Facts needed to decide whether a support may be placed.
#[derive(Debug, Clone, Copy)]
pub struct SupportCheck {
    pub bet_owner_id: DbId,
    pub bet_status: BetStatus,
    pub bet_created_at: Timestamp,
    pub supporter_id: DbId,
    pub already_supporting: bool,
}

/// Check whether a support may be placed at `now`.
///
/// The error message is suitable for showing to the would-be supporter.
/// Balance is checked separately by the ledger.
pub fn check_eligibility(check: &SupportCheck, now: Timestamp) -> Result<(), CoreError> {
    if check.bet_owner_id == check.supporter_id {
        return Err(CoreError::Validation(
            "You can't support your own bet".into(),
        ));
    }
    if check.bet_status.is_terminal() {
        return Err(CoreError::Conflict("This bet is no longer active".into()));
    }
    if check.already_supporting {
        return Err(CoreError::Conflict(
            "You're already supporting this bet".into(),
        ));
    }
    if check.bet_created_at <= now - Duration::days(SUPPORT_WINDOW_DAYS) {
        return Err(CoreError::Conflict(
            "This bet is older than 2 weeks and can no longer be supported".into(),
        ));
    }
    Ok(())
}

/// Human-readable reason from an eligibility error, without the error prefix.
pub fn rejection_reason(err: &CoreError) -> String {
    match err {
        CoreError::Validation(msg) | CoreError::Conflict(msg) => msg.clone(),
        other => other.to_string(),
    }
}
