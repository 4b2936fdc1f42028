//! Bet terms, lifecycle states and payout rules.
//!
//! A bet stakes Gold Coins on a weekly habit for `duration_weeks` weeks. Each
//! completed check-in advances `current_week` by one; completing the last week
//! wins the bet and pays `stake * duration_weeks`. Missing a weekly deadline
//! loses it and forfeits the stake.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Coins;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Smallest stake accepted for a bet or a support.
pub const MIN_STAKE: Coins = 10;

/// Largest stake accepted for a bet or a support.
pub const MAX_STAKE: Coins = 500;

/// Shortest bet, in weeks.
pub const MIN_DURATION_WEEKS: i32 = 2;

/// Longest bet, in weeks.
pub const MAX_DURATION_WEEKS: i32 = 12;

/// Maximum length of a habit description, in characters.
pub const MAX_HABIT_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Lifecycle status of a bet. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    Active,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl FromStr for BetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            other => Err(CoreError::Validation(format!(
                "Unknown bet status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetCategory {
    Health,
    Learning,
    Creative,
    Social,
    Financial,
    Other,
}

impl BetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Learning => "learning",
            Self::Creative => "creative",
            Self::Social => "social",
            Self::Financial => "financial",
            Self::Other => "other",
        }
    }
}

impl FromStr for BetCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(Self::Health),
            "learning" => Ok(Self::Learning),
            "creative" => Ok(Self::Creative),
            "social" => Ok(Self::Social),
            "financial" => Ok(Self::Financial),
            "other" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown bet category '{other}'"
            ))),
        }
    }
}

/// How the accountability buddy relates to the bet owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuddyRelationship {
    Friend,
    Family,
    Coworker,
    Coach,
}

impl BuddyRelationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Friend => "friend",
            Self::Family => "family",
            Self::Coworker => "coworker",
            Self::Coach => "coach",
        }
    }
}

impl FromStr for BuddyRelationship {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friend" => Ok(Self::Friend),
            "family" => Ok(Self::Family),
            "coworker" => Ok(Self::Coworker),
            "coach" => Ok(Self::Coach),
            other => Err(CoreError::Validation(format!(
                "Unknown buddy relationship '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Terms validation
// ---------------------------------------------------------------------------

/// Raw bet terms as submitted by a client.
#[derive(Debug, Clone, Copy)]
pub struct BetTerms<'a> {
    pub habit_description: &'a str,
    pub category: Option<&'a str>,
    pub stake_amount: Coins,
    pub duration_weeks: i32,
    pub buddy_email: Option<&'a str>,
    pub buddy_relationship: Option<&'a str>,
}

/// Bet terms after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTerms {
    pub habit_description: String,
    pub category: Option<BetCategory>,
    pub stake_amount: Coins,
    pub duration_weeks: i32,
    pub buddy_email: Option<String>,
    pub buddy_relationship: Option<BuddyRelationship>,
}

/// Validate a stake amount against [`MIN_STAKE`]..=[`MAX_STAKE`].
pub fn validate_stake(stake: Coins) -> Result<(), CoreError> {
    if !(MIN_STAKE..=MAX_STAKE).contains(&stake) {
        return Err(CoreError::Validation(format!(
            "Stake must be between {MIN_STAKE} and {MAX_STAKE} GC"
        )));
    }
    Ok(())
}

/// Validate and normalize bet terms.
///
/// The habit is trimmed, blank optional strings are treated as absent, and a
/// buddy email without a relationship defaults to [`BuddyRelationship::Friend`].
/// A relationship without an email is rejected.
pub fn validate_terms(terms: &BetTerms<'_>) -> Result<ValidatedTerms, CoreError> {
    let habit = terms.habit_description.trim();
    if habit.is_empty() {
        return Err(CoreError::Validation(
            "Habit description must not be empty".into(),
        ));
    }
    if habit.chars().count() > MAX_HABIT_LEN {
        return Err(CoreError::Validation(format!(
            "Habit description must be at most {MAX_HABIT_LEN} characters"
        )));
    }

    validate_stake(terms.stake_amount)?;

    if !(MIN_DURATION_WEEKS..=MAX_DURATION_WEEKS).contains(&terms.duration_weeks) {
        return Err(CoreError::Validation(format!(
            "Duration must be between {MIN_DURATION_WEEKS} and {MAX_DURATION_WEEKS} weeks"
        )));
    }

    let category = non_blank(terms.category)
        .map(BetCategory::from_str)
        .transpose()?;

    let buddy_email = non_blank(terms.buddy_email).map(str::to_string);
    if let Some(email) = &buddy_email {
        if !email.validate_email() {
            return Err(CoreError::Validation(format!(
                "Invalid buddy email '{email}'"
            )));
        }
    }

    let relationship = non_blank(terms.buddy_relationship)
        .map(BuddyRelationship::from_str)
        .transpose()?;
    let buddy_relationship = match (&buddy_email, relationship) {
        (Some(_), Some(r)) => Some(r),
        (Some(_), None) => Some(BuddyRelationship::Friend),
        (None, Some(_)) => {
            return Err(CoreError::Validation(
                "A buddy relationship requires a buddy email".into(),
            ))
        }
        (None, None) => None,
    };

    Ok(ValidatedTerms {
        habit_description: habit.to_string(),
        category,
        stake_amount: terms.stake_amount,
        duration_weeks: terms.duration_weeks,
        buddy_email,
        buddy_relationship,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// What a successful check-in does to the bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStep {
    /// More weeks remain; the bet moves on to `next_week`.
    Advance { next_week: i32 },
    /// The final week was completed; the bet is won.
    Complete,
}

/// Decide the step taken after completing `current_week` of `duration_weeks`.
pub fn step_after_checkin(current_week: i32, duration_weeks: i32) -> WeekStep {
    if current_week >= duration_weeks {
        WeekStep::Complete
    } else {
        WeekStep::Advance {
            next_week: current_week + 1,
        }
    }
}

/// Whether completing `completed_week` marks the exact halfway point.
///
/// Only even durations have an exact halfway week.
pub fn is_halfway(completed_week: i32, duration_weeks: i32) -> bool {
    duration_weeks % 2 == 0 && completed_week * 2 == duration_weeks
}

/// Reject operations on bets that are already resolved.
pub fn ensure_active(status: BetStatus) -> Result<(), CoreError> {
    if status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Bet is no longer active (status: {status})"
        )));
    }
    Ok(())
}

/// Coins credited to the owner when a bet is won.
pub fn win_payout(stake: Coins, duration_weeks: i32) -> Coins {
    stake * Coins::from(duration_weeks)
}

/// Share of resolved bets that were won, as a whole percentage rounded half
/// up. Active bets do not count; `0` when nothing is resolved yet.
pub fn win_rate_percent(won: i64, lost: i64) -> i64 {
    let resolved = won + lost;
    if resolved <= 0 {
        return 0;
    }
    (won * 200 + resolved) / (resolved * 2)
}
