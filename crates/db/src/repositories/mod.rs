//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Read-only queries live in the
//! per-table repositories; every write that moves coins or changes a bet's
//! lifecycle goes through [`LedgerRepo`] so it runs in one transaction.

pub mod bet_repo;
pub mod checkin_repo;
pub mod coin_ledger_repo;
pub mod cosmetic_repo;
pub mod ledger_repo;
pub mod profile_repo;
pub mod support_repo;
pub mod wall_event_repo;

pub use bet_repo::BetRepo;
pub use checkin_repo::CheckinRepo;
pub use coin_ledger_repo::CoinLedgerRepo;
pub use cosmetic_repo::CosmeticRepo;
pub use ledger_repo::LedgerRepo;
pub use profile_repo::ProfileRepo;
pub use support_repo::SupportRepo;
pub use wall_event_repo::WallEventRepo;

/// Column list for `profiles` queries.
pub(crate) const PROFILE_COLUMNS: &str = "\
    id, email, password_hash, display_name, avatar_url, balance, \
    active_avatar_id, timezone, last_login_bonus_at, created_at, updated_at";

/// Column list for `bets` queries.
pub(crate) const BET_COLUMNS: &str = "\
    id, user_id, habit_description, category, stake_amount, duration_weeks, \
    current_week, status, buddy_email, buddy_relationship, started_at, \
    completed_at, created_at, updated_at";

/// Column list for `checkins` queries.
pub(crate) const CHECKIN_COLUMNS: &str = "\
    id, bet_id, week_number, completed, checked_in_at, buddy_notified, created_at";

/// Column list for `supports` queries.
pub(crate) const SUPPORT_COLUMNS: &str = "\
    id, bet_id, supporter_id, stake_amount, payout_amount, created_at";
