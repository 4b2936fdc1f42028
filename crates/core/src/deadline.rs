//! Weekly deadline arithmetic.
//!
//! Week `n` of a bet (1-based) starts at `started_at + (n - 1) * 7 days` and
//! its check-in deadline is seven days later. The deadline instant itself is
//! still on time; a bet is overdue only when `now` is strictly after it.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Length of one bet week, in days.
pub const WEEK_DAYS: i64 = 7;

/// Start of the given 1-based week.
pub fn week_start(started_at: Timestamp, week: i32) -> Timestamp {
    started_at + Duration::days(i64::from(week - 1) * WEEK_DAYS)
}

/// Check-in deadline for the given 1-based week.
pub fn week_deadline(started_at: Timestamp, week: i32) -> Timestamp {
    week_start(started_at, week) + Duration::days(WEEK_DAYS)
}

/// Whether the deadline for `current_week` has passed at `now`.
pub fn is_overdue(started_at: Timestamp, current_week: i32, now: Timestamp) -> bool {
    now > week_deadline(started_at, current_week)
}

/// Ensure `now` falls inside the check-in window of `current_week`.
///
/// Early check-ins (before the week started) and late ones (after the
/// deadline) are both rejected.
pub fn ensure_checkin_window(
    started_at: Timestamp,
    current_week: i32,
    now: Timestamp,
) -> Result<(), CoreError> {
    let start = week_start(started_at, current_week);
    if now < start {
        return Err(CoreError::Conflict(format!(
            "Week {current_week} has not started yet; it opens at {start}"
        )));
    }
    if is_overdue(started_at, current_week, now) {
        return Err(CoreError::Conflict(format!(
            "The deadline for week {current_week} has passed"
        )));
    }
    Ok(())
}
