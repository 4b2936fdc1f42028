//! Bet models, DTOs and ledger outcomes.

use habitstake_core::bet::BetStatus;
use habitstake_core::error::CoreError;
use habitstake_core::types::{Coins, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::checkin::Checkin;

/// A row from the `bets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bet {
    pub id: DbId,
    pub user_id: DbId,
    pub habit_description: String,
    pub category: Option<String>,
    pub stake_amount: Coins,
    pub duration_weeks: i32,
    pub current_week: i32,
    pub status: String,
    pub buddy_email: Option<String>,
    pub buddy_relationship: Option<String>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Bet {
    /// Parse the stored status text.
    pub fn parsed_status(&self) -> Result<BetStatus, CoreError> {
        self.status.parse()
    }
}

/// Request body for creating a bet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBet {
    pub habit_description: String,
    pub category: Option<String>,
    pub stake_amount: Coins,
    pub duration_weeks: i32,
    pub buddy_email: Option<String>,
    pub buddy_relationship: Option<String>,
}

/// Result of a successful weekly check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinOutcome {
    /// The bet after the check-in (advanced or won).
    pub bet: Bet,
    /// The completed check-in row.
    pub checkin: Checkin,
    pub completed_week: i32,
    pub won: bool,
    /// Coins credited to the owner when this check-in won the bet.
    pub payout: Option<Coins>,
}

/// Per-user bet counts and coin totals.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct BetStats {
    pub active: i64,
    pub won: i64,
    pub lost: i64,
    /// Sum of owner payouts over won bets.
    pub total_won: Coins,
    /// Sum of stakes forfeited on lost bets.
    pub total_lost: Coins,
}

/// Result of a win/loss resolution attempt.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The bet was active and is now resolved.
    Resolved(Bet),
    /// The bet had already reached a terminal status; nothing changed.
    AlreadyResolved(Bet),
    /// The bet is active but its current week is not overdue, or that week
    /// is already checked in; nothing changed.
    NotDue(Bet),
}

impl Resolution {
    pub fn bet(&self) -> &Bet {
        match self {
            Self::Resolved(bet) | Self::AlreadyResolved(bet) | Self::NotDue(bet) => bet,
        }
    }

    pub fn was_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}
