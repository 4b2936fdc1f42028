//! Transactional procedures that move coins or change a bet's lifecycle.
//!
//! Every public method runs in one transaction. Rows that are mutated are
//! locked with `SELECT ... FOR UPDATE`, always bet before profile, so
//! concurrent requests and overlapping sweeps serialize per row. Each balance
//! change is paired with a `coin_ledger` entry, which keeps a profile's
//! balance equal to the sum of its ledger deltas.

use habitstake_core::bet::{
    ensure_active, is_halfway, step_after_checkin, validate_stake, validate_terms, win_payout,
    BetTerms, WeekStep,
};
use habitstake_core::bonus::{bonus_available, LOGIN_BONUS};
use habitstake_core::deadline::{ensure_checkin_window, is_overdue};
use habitstake_core::error::CoreError;
use habitstake_core::ledger::{ensure_affordable, LedgerReason, SIGNUP_GRANT};
use habitstake_core::shop::{ensure_avatar_for_sale, ensure_not_owned, ensure_owned_avatar};
use habitstake_core::support::{check_eligibility, SupportCheck};
use habitstake_core::types::{Coins, DbId, Timestamp};
use habitstake_core::wall::{self, WallEventType};
use sqlx::{PgConnection, PgPool};

use super::cosmetic_repo::AVATAR_COLUMNS;
use super::{BET_COLUMNS, CHECKIN_COLUMNS, PROFILE_COLUMNS, SUPPORT_COLUMNS};
use crate::error::LedgerError;
use crate::models::bet::{Bet, CheckinOutcome, CreateBet, Resolution};
use crate::models::checkin::Checkin;
use crate::models::cosmetic::{Avatar, Collectible};
use crate::models::profile::{CreateProfile, Profile};
use crate::models::support::Support;

pub struct LedgerRepo;

impl LedgerRepo {
    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    /// Create a profile funded with the signup grant and announce it on the
    /// wall.
    ///
    /// A duplicate email fails on the `uq_profiles_email` constraint.
    pub async fn register(pool: &PgPool, input: &CreateProfile) -> Result<Profile, LedgerError> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO profiles (email, password_hash, display_name) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.display_name)
        .fetch_one(&mut *tx)
        .await?;

        adjust_balance(&mut *tx, id, SIGNUP_GRANT, LedgerReason::SignupGrant, None).await?;
        insert_wall_event(
            &mut *tx,
            WallEventType::Signup,
            id,
            None,
            wall::signup_metadata(input.display_name.as_deref().unwrap_or_default()),
        )
        .await?;

        let profile = lock_profile(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(profile_id = id, grant = SIGNUP_GRANT, "Profile registered");
        Ok(profile)
    }

    /// Credit the daily login bonus.
    ///
    /// Returns the amount credited, or `0` without touching anything when the
    /// bonus was already claimed on the same UTC day.
    pub async fn claim_login_bonus(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Coins, LedgerError> {
        let mut tx = pool.begin().await?;
        let profile = lock_profile(&mut *tx, user_id).await?;

        if !bonus_available(profile.last_login_bonus_at, now) {
            return Ok(0);
        }

        adjust_balance(&mut *tx, user_id, LOGIN_BONUS, LedgerReason::LoginBonus, None).await?;
        sqlx::query("UPDATE profiles SET last_login_bonus_at = $2 WHERE id = $1")
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id, amount = LOGIN_BONUS, "Login bonus claimed");
        Ok(LOGIN_BONUS)
    }

    // -----------------------------------------------------------------------
    // Bets
    // -----------------------------------------------------------------------

    /// Validate terms, escrow the stake and open week 1.
    pub async fn create_bet(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateBet,
        now: Timestamp,
    ) -> Result<Bet, LedgerError> {
        let terms = validate_terms(&BetTerms {
            habit_description: &input.habit_description,
            category: input.category.as_deref(),
            stake_amount: input.stake_amount,
            duration_weeks: input.duration_weeks,
            buddy_email: input.buddy_email.as_deref(),
            buddy_relationship: input.buddy_relationship.as_deref(),
        })?;

        let mut tx = pool.begin().await?;
        let profile = lock_profile(&mut *tx, user_id).await?;
        ensure_affordable(profile.balance, terms.stake_amount)?;

        let query = format!(
            "INSERT INTO bets \
                (user_id, habit_description, category, stake_amount, duration_weeks, \
                 buddy_email, buddy_relationship, started_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {BET_COLUMNS}"
        );
        let bet = sqlx::query_as::<_, Bet>(&query)
            .bind(user_id)
            .bind(&terms.habit_description)
            .bind(terms.category.map(|c| c.as_str()))
            .bind(terms.stake_amount)
            .bind(terms.duration_weeks)
            .bind(&terms.buddy_email)
            .bind(terms.buddy_relationship.map(|r| r.as_str()))
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        adjust_balance(
            &mut *tx,
            user_id,
            LedgerReason::BetStake.signed(bet.stake_amount),
            LedgerReason::BetStake,
            Some(bet.id),
        )
        .await?;
        insert_checkin_row(&mut *tx, bet.id, 1).await?;
        insert_wall_event(
            &mut *tx,
            WallEventType::BetCreated,
            user_id,
            Some(bet.id),
            wall::bet_created_metadata(&bet.habit_description, bet.stake_amount, bet.duration_weeks),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            bet_id = bet.id,
            user_id,
            stake = bet.stake_amount,
            weeks = bet.duration_weeks,
            "Bet created"
        );
        Ok(bet)
    }

    /// Complete the current week of a bet.
    ///
    /// Only the owner may check in, only while the bet is active and only
    /// inside the current week's window. Completing the final week wins the
    /// bet in the same transaction; any other week advances the bet and opens
    /// the next week's row.
    pub async fn checkin_week(
        pool: &PgPool,
        user_id: DbId,
        bet_id: DbId,
        notify_buddy: bool,
        now: Timestamp,
    ) -> Result<CheckinOutcome, LedgerError> {
        let mut tx = pool.begin().await?;
        let bet = lock_bet(&mut *tx, bet_id).await?;

        if bet.user_id != user_id {
            return Err(CoreError::Forbidden("Only the bet owner can check in".into()).into());
        }
        ensure_active(bet.parsed_status()?)?;
        ensure_checkin_window(bet.started_at, bet.current_week, now)?;

        let week = bet.current_week;
        let buddy_notified = notify_buddy && bet.buddy_email.is_some();
        let query = format!(
            "UPDATE checkins \
             SET completed = TRUE, checked_in_at = $3, buddy_notified = $4 \
             WHERE bet_id = $1 AND week_number = $2 AND completed = FALSE \
             RETURNING {CHECKIN_COLUMNS}"
        );
        let checkin = sqlx::query_as::<_, Checkin>(&query)
            .bind(bet_id)
            .bind(week)
            .bind(now)
            .bind(buddy_notified)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::Conflict(format!("Week {week} is already checked in")))?;

        let outcome = match step_after_checkin(week, bet.duration_weeks) {
            WeekStep::Advance { next_week } => {
                let query = format!(
                    "UPDATE bets SET current_week = $2 WHERE id = $1 RETURNING {BET_COLUMNS}"
                );
                let advanced = sqlx::query_as::<_, Bet>(&query)
                    .bind(bet_id)
                    .bind(next_week)
                    .fetch_one(&mut *tx)
                    .await?;
                insert_checkin_row(&mut *tx, bet_id, next_week).await?;

                if is_halfway(week, bet.duration_weeks) {
                    insert_wall_event(
                        &mut *tx,
                        WallEventType::Milestone,
                        bet.user_id,
                        Some(bet_id),
                        wall::milestone_metadata(&bet.habit_description, week, bet.duration_weeks),
                    )
                    .await?;
                }

                CheckinOutcome {
                    bet: advanced,
                    checkin,
                    completed_week: week,
                    won: false,
                    payout: None,
                }
            }
            WeekStep::Complete => {
                let (won, payout) = settle_win(&mut *tx, &bet, now).await?;
                CheckinOutcome {
                    bet: won,
                    checkin,
                    completed_week: week,
                    won: true,
                    payout: Some(payout),
                }
            }
        };

        tx.commit().await?;

        tracing::info!(
            bet_id,
            user_id,
            week,
            won = outcome.won,
            buddy_notified,
            "Week checked in"
        );
        Ok(outcome)
    }

    /// Resolve a bet as won and pay out the owner and every supporter.
    ///
    /// Returns [`Resolution::AlreadyResolved`] without changes when the bet
    /// is no longer active. Rejected unless every week is completed.
    pub async fn resolve_bet_win(
        pool: &PgPool,
        bet_id: DbId,
        now: Timestamp,
    ) -> Result<Resolution, LedgerError> {
        let mut tx = pool.begin().await?;
        let bet = lock_bet(&mut *tx, bet_id).await?;

        if bet.parsed_status()?.is_terminal() {
            return Ok(Resolution::AlreadyResolved(bet));
        }

        let (won, _) = settle_win(&mut *tx, &bet, now).await?;
        tx.commit().await?;
        Ok(Resolution::Resolved(won))
    }

    /// Resolve a bet as lost. The owner's and supporters' stakes stay
    /// forfeited; each support's payout is recorded as `0`.
    ///
    /// Returns [`Resolution::AlreadyResolved`] without changes when the bet
    /// is no longer active, and [`Resolution::NotDue`] when, under the bet
    /// lock, the current week's deadline has not passed at `now` or its
    /// check-in is already complete.
    pub async fn resolve_bet_loss(
        pool: &PgPool,
        bet_id: DbId,
        now: Timestamp,
    ) -> Result<Resolution, LedgerError> {
        let mut tx = pool.begin().await?;
        let bet = lock_bet(&mut *tx, bet_id).await?;

        if bet.parsed_status()?.is_terminal() {
            return Ok(Resolution::AlreadyResolved(bet));
        }
        if !is_overdue(bet.started_at, bet.current_week, now) {
            return Ok(Resolution::NotDue(bet));
        }

        let pending: Option<bool> = sqlx::query_scalar(
            "SELECT NOT completed FROM checkins \
             WHERE bet_id = $1 AND week_number = $2 FOR UPDATE",
        )
        .bind(bet_id)
        .bind(bet.current_week)
        .fetch_optional(&mut *tx)
        .await?;
        if pending != Some(true) {
            return Ok(Resolution::NotDue(bet));
        }

        sqlx::query("UPDATE supports SET payout_amount = 0 WHERE bet_id = $1")
            .bind(bet_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE bets SET status = 'lost', completed_at = $2 WHERE id = $1 \
             RETURNING {BET_COLUMNS}"
        );
        let lost = sqlx::query_as::<_, Bet>(&query)
            .bind(bet_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        insert_wall_event(
            &mut *tx,
            WallEventType::BetLost,
            lost.user_id,
            Some(bet_id),
            wall::bet_lost_metadata(
                &lost.habit_description,
                lost.stake_amount,
                lost.current_week,
                lost.duration_weeks,
            ),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            bet_id,
            user_id = lost.user_id,
            failed_at_week = lost.current_week,
            lost = lost.stake_amount,
            "Bet lost"
        );
        Ok(Resolution::Resolved(lost))
    }

    // -----------------------------------------------------------------------
    // Supports
    // -----------------------------------------------------------------------

    /// Back someone else's active bet with a stake of one's own.
    pub async fn support_bet(
        pool: &PgPool,
        supporter_id: DbId,
        bet_id: DbId,
        stake_amount: Coins,
        now: Timestamp,
    ) -> Result<Support, LedgerError> {
        validate_stake(stake_amount)?;

        let mut tx = pool.begin().await?;
        let bet = lock_bet(&mut *tx, bet_id).await?;

        let already_supporting: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM supports WHERE bet_id = $1 AND supporter_id = $2)",
        )
        .bind(bet_id)
        .bind(supporter_id)
        .fetch_one(&mut *tx)
        .await?;

        check_eligibility(
            &SupportCheck {
                bet_owner_id: bet.user_id,
                bet_status: bet.parsed_status()?,
                bet_created_at: bet.created_at,
                supporter_id,
                already_supporting,
            },
            now,
        )?;

        let profile = lock_profile(&mut *tx, supporter_id).await?;
        ensure_affordable(profile.balance, stake_amount)?;

        let query = format!(
            "INSERT INTO supports (bet_id, supporter_id, stake_amount, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING {SUPPORT_COLUMNS}"
        );
        let support = sqlx::query_as::<_, Support>(&query)
            .bind(bet_id)
            .bind(supporter_id)
            .bind(stake_amount)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        adjust_balance(
            &mut *tx,
            supporter_id,
            LedgerReason::SupportStake.signed(stake_amount),
            LedgerReason::SupportStake,
            Some(bet_id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(bet_id, supporter_id, stake = stake_amount, "Bet supported");
        Ok(support)
    }

    // -----------------------------------------------------------------------
    // Shop
    // -----------------------------------------------------------------------

    /// Buy an avatar. Premium avatars are not for sale.
    pub async fn purchase_avatar(
        pool: &PgPool,
        user_id: DbId,
        avatar_id: DbId,
    ) -> Result<Profile, LedgerError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {AVATAR_COLUMNS} FROM avatars WHERE id = $1");
        let avatar = sqlx::query_as::<_, Avatar>(&query)
            .bind(avatar_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Avatar",
                id: avatar_id,
            })?;
        ensure_avatar_for_sale(avatar.id, avatar.is_premium)?;

        let profile = lock_profile(&mut *tx, user_id).await?;
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_avatars WHERE user_id = $1 AND avatar_id = $2)",
        )
        .bind(user_id)
        .bind(avatar_id)
        .fetch_one(&mut *tx)
        .await?;
        ensure_not_owned("avatar", avatar_id, owned)?;
        ensure_affordable(profile.balance, avatar.price)?;

        sqlx::query("INSERT INTO user_avatars (user_id, avatar_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(avatar_id)
            .execute(&mut *tx)
            .await?;
        adjust_balance(
            &mut *tx,
            user_id,
            LedgerReason::AvatarPurchase.signed(avatar.price),
            LedgerReason::AvatarPurchase,
            None,
        )
        .await?;

        let profile = lock_profile(&mut *tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(user_id, avatar_id, price = avatar.price, "Avatar purchased");
        Ok(profile)
    }

    /// Buy a collectible.
    pub async fn purchase_collectible(
        pool: &PgPool,
        user_id: DbId,
        collectible_id: DbId,
    ) -> Result<Profile, LedgerError> {
        let mut tx = pool.begin().await?;

        let collectible = sqlx::query_as::<_, Collectible>(
            "SELECT id, emoji, name, tier, price, created_at FROM collectibles WHERE id = $1",
        )
        .bind(collectible_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Collectible",
            id: collectible_id,
        })?;

        let profile = lock_profile(&mut *tx, user_id).await?;
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_collectibles \
                           WHERE user_id = $1 AND collectible_id = $2)",
        )
        .bind(user_id)
        .bind(collectible_id)
        .fetch_one(&mut *tx)
        .await?;
        ensure_not_owned("collectible", collectible_id, owned)?;
        ensure_affordable(profile.balance, collectible.price)?;

        sqlx::query("INSERT INTO user_collectibles (user_id, collectible_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(collectible_id)
            .execute(&mut *tx)
            .await?;
        adjust_balance(
            &mut *tx,
            user_id,
            LedgerReason::CollectiblePurchase.signed(collectible.price),
            LedgerReason::CollectiblePurchase,
            None,
        )
        .await?;

        let profile = lock_profile(&mut *tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            collectible_id,
            price = collectible.price,
            "Collectible purchased"
        );
        Ok(profile)
    }

    /// Make an owned avatar the profile's active one.
    pub async fn set_active_avatar(
        pool: &PgPool,
        user_id: DbId,
        avatar_id: DbId,
    ) -> Result<Profile, LedgerError> {
        let mut tx = pool.begin().await?;
        lock_profile(&mut *tx, user_id).await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM avatars WHERE id = $1)")
            .bind(avatar_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(CoreError::NotFound {
                entity: "Avatar",
                id: avatar_id,
            }
            .into());
        }

        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_avatars WHERE user_id = $1 AND avatar_id = $2)",
        )
        .bind(user_id)
        .bind(avatar_id)
        .fetch_one(&mut *tx)
        .await?;
        ensure_owned_avatar(avatar_id, owned)?;

        let query = format!(
            "UPDATE profiles SET active_avatar_id = $2 WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(avatar_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id, avatar_id, "Active avatar changed");
        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Lock a profile row for the rest of the transaction.
async fn lock_profile(conn: &mut PgConnection, id: DbId) -> Result<Profile, LedgerError> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Profile>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Profile",
                id,
            }
            .into()
        })
}

/// Lock a bet row for the rest of the transaction.
async fn lock_bet(conn: &mut PgConnection, id: DbId) -> Result<Bet, LedgerError> {
    let query = format!("SELECT {BET_COLUMNS} FROM bets WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Bet>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Bet", id }.into())
}

/// Apply `delta` to a profile's balance and record it in `coin_ledger`.
///
/// A zero delta (free items) changes nothing and writes no ledger row.
/// Returns the new balance.
async fn adjust_balance(
    conn: &mut PgConnection,
    profile_id: DbId,
    delta: Coins,
    reason: LedgerReason,
    bet_id: Option<DbId>,
) -> Result<Coins, LedgerError> {
    let balance: Coins = sqlx::query_scalar(
        "UPDATE profiles SET balance = balance + $2 WHERE id = $1 RETURNING balance",
    )
    .bind(profile_id)
    .bind(delta)
    .fetch_one(&mut *conn)
    .await?;

    if delta != 0 {
        sqlx::query(
            "INSERT INTO coin_ledger (profile_id, delta, reason, bet_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(profile_id)
        .bind(delta)
        .bind(reason.as_str())
        .bind(bet_id)
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(profile_id, delta, reason = reason.as_str(), balance, "Balance adjusted");
    Ok(balance)
}

async fn insert_checkin_row(
    conn: &mut PgConnection,
    bet_id: DbId,
    week_number: i32,
) -> Result<(), LedgerError> {
    sqlx::query("INSERT INTO checkins (bet_id, week_number) VALUES ($1, $2)")
        .bind(bet_id)
        .bind(week_number)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn insert_wall_event(
    conn: &mut PgConnection,
    event_type: WallEventType,
    user_id: DbId,
    bet_id: Option<DbId>,
    metadata: serde_json::Value,
) -> Result<(), LedgerError> {
    sqlx::query(
        "INSERT INTO wall_events (event_type, user_id, bet_id, metadata) VALUES ($1, $2, $3, $4)",
    )
    .bind(event_type.as_str())
    .bind(user_id)
    .bind(bet_id)
    .bind(metadata)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Pay out a bet whose weeks are all completed and mark it won.
///
/// The caller holds the bet lock. Returns the updated bet and the owner's
/// payout.
async fn settle_win(
    conn: &mut PgConnection,
    bet: &Bet,
    now: Timestamp,
) -> Result<(Bet, Coins), LedgerError> {
    let completed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM checkins WHERE bet_id = $1 AND completed")
            .bind(bet.id)
            .fetch_one(&mut *conn)
            .await?;
    if completed < i64::from(bet.duration_weeks) {
        return Err(CoreError::Conflict(format!(
            "Only {completed} of {} weeks are completed",
            bet.duration_weeks
        ))
        .into());
    }

    let payout = win_payout(bet.stake_amount, bet.duration_weeks);
    adjust_balance(
        conn,
        bet.user_id,
        payout,
        LedgerReason::BetPayout,
        Some(bet.id),
    )
    .await?;

    let query = format!(
        "SELECT {SUPPORT_COLUMNS} FROM supports WHERE bet_id = $1 ORDER BY id FOR UPDATE"
    );
    let supports = sqlx::query_as::<_, Support>(&query)
        .bind(bet.id)
        .fetch_all(&mut *conn)
        .await?;

    for support in &supports {
        let amount = win_payout(support.stake_amount, bet.duration_weeks);
        sqlx::query("UPDATE supports SET payout_amount = $2 WHERE id = $1")
            .bind(support.id)
            .bind(amount)
            .execute(&mut *conn)
            .await?;
        adjust_balance(
            conn,
            support.supporter_id,
            amount,
            LedgerReason::SupportPayout,
            Some(bet.id),
        )
        .await?;
    }

    let query = format!(
        "UPDATE bets SET status = 'won', completed_at = $2 WHERE id = $1 RETURNING {BET_COLUMNS}"
    );
    let won = sqlx::query_as::<_, Bet>(&query)
        .bind(bet.id)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

    insert_wall_event(
        conn,
        WallEventType::BetWon,
        won.user_id,
        Some(won.id),
        wall::bet_won_metadata(&won.habit_description, payout, won.duration_weeks, supports.len()),
    )
    .await?;

    tracing::info!(
        bet_id = won.id,
        user_id = won.user_id,
        payout,
        supporters = supports.len(),
        "Bet won"
    );
    Ok((won, payout))
}
