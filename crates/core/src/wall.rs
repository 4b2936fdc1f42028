//! Wall (public activity feed) event types and metadata payloads.
//!
//! Metadata is free-form JSON; the builders here fix the keys each event
//! type carries so producers and readers agree on them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::Coins;

/// Number of wall events returned when no limit is given.
pub const DEFAULT_FEED_LIMIT: i64 = 50;

/// Largest page of wall events served at once.
pub const MAX_FEED_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallEventType {
    Signup,
    BetCreated,
    BetWon,
    BetLost,
    Milestone,
}

impl WallEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::BetCreated => "bet_created",
            Self::BetWon => "bet_won",
            Self::BetLost => "bet_lost",
            Self::Milestone => "milestone",
        }
    }
}

pub fn signup_metadata(display_name: &str) -> Value {
    json!({ "display_name": display_name })
}

pub fn bet_created_metadata(habit: &str, stake: Coins, weeks: i32) -> Value {
    json!({ "habit": habit, "stake": stake, "weeks": weeks })
}

pub fn bet_won_metadata(habit: &str, payout: Coins, weeks: i32, supporters: usize) -> Value {
    json!({
        "habit": habit,
        "payout": payout,
        "weeks": weeks,
        "supporters": supporters,
    })
}

pub fn bet_lost_metadata(habit: &str, lost: Coins, failed_at_week: i32, weeks: i32) -> Value {
    json!({
        "habit": habit,
        "lost": lost,
        "failed_at_week": failed_at_week,
        "weeks": weeks,
    })
}

pub fn milestone_metadata(habit: &str, week: i32, weeks: i32) -> Value {
    json!({
        "description": format!("Halfway there on \"{habit}\": week {week} of {weeks} done"),
        "habit": habit,
        "week": week,
        "weeks": weeks,
    })
}
