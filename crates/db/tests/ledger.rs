//! Integration tests for the transactional ledger procedures.

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use habitstake_core::error::CoreError;
use habitstake_core::types::{Coins, DbId, Timestamp};
use habitstake_db::models::bet::{Bet, CreateBet, Resolution};
use habitstake_db::models::profile::{CreateProfile, Profile};
use habitstake_db::repositories::{
    BetRepo, CheckinRepo, CoinLedgerRepo, CosmeticRepo, LedgerRepo, ProfileRepo, SupportRepo,
    WallEventRepo,
};
use habitstake_db::LedgerError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// A moment inside the given 1-based week of a bet started at [`start`].
fn during_week(week: i32) -> Timestamp {
    start() + Duration::days(i64::from(week - 1) * 7 + 1)
}

async fn new_profile(pool: &PgPool, email: &str) -> Profile {
    LedgerRepo::register(
        pool,
        &CreateProfile {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            display_name: Some(email.split('@').next().unwrap().to_string()),
        },
    )
    .await
    .unwrap()
}

fn bet_input(stake: Coins, weeks: i32) -> CreateBet {
    CreateBet {
        habit_description: "Read 20 pages a day".to_string(),
        category: Some("learning".to_string()),
        stake_amount: stake,
        duration_weeks: weeks,
        buddy_email: None,
        buddy_relationship: None,
    }
}

async fn new_bet(pool: &PgPool, user_id: DbId, stake: Coins, weeks: i32) -> Bet {
    LedgerRepo::create_bet(pool, user_id, &bet_input(stake, weeks), start())
        .await
        .unwrap()
}

async fn balance(pool: &PgPool, id: DbId) -> Coins {
    ProfileRepo::find_by_id(pool, id).await.unwrap().unwrap().balance
}

/// Balance must always equal the sum of ledger deltas.
async fn assert_conserved(pool: &PgPool, id: DbId) {
    let sum = CoinLedgerRepo::sum_for_profile(pool, id).await.unwrap();
    assert_eq!(balance(pool, id).await, sum, "ledger out of sync for {id}");
}

// ---------------------------------------------------------------------------
// Registration and bonus
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_grants_signup_coins(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    assert_eq!(p.balance, 1000);
    assert_conserved(&pool, p.id).await;

    let feed = WallEventRepo::list_feed(&pool, 10, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].event_type, "signup");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_hits_unique_constraint(pool: PgPool) {
    new_profile(&pool, "ada@example.com").await;
    let err = LedgerRepo::register(
        &pool,
        &CreateProfile {
            email: "ada@example.com".into(),
            password_hash: "hash".into(),
            display_name: None,
        },
    )
    .await
    .unwrap_err();

    let LedgerError::Database(db) = err else {
        panic!("expected database error, got {err:?}");
    };
    let constraint = db.as_database_error().and_then(|e| e.constraint());
    assert_eq!(constraint, Some("uq_profiles_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_bonus_once_per_day(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let morning = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();

    assert_eq!(LedgerRepo::claim_login_bonus(&pool, p.id, morning).await.unwrap(), 200);
    assert_eq!(
        LedgerRepo::claim_login_bonus(&pool, p.id, morning + Duration::hours(10))
            .await
            .unwrap(),
        0
    );
    assert_eq!(balance(&pool, p.id).await, 1200);

    let tomorrow = morning + Duration::days(1);
    assert_eq!(LedgerRepo::claim_login_bonus(&pool, p.id, tomorrow).await.unwrap(), 200);
    assert_eq!(balance(&pool, p.id).await, 1400);
    assert_conserved(&pool, p.id).await;
}

// ---------------------------------------------------------------------------
// Bet creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_bet_escrows_stake(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 100, 4).await;

    assert_eq!(bet.status, "active");
    assert_eq!(bet.current_week, 1);
    assert_eq!(bet.started_at, start());
    assert_eq!(balance(&pool, p.id).await, 900);
    assert_conserved(&pool, p.id).await;

    let rows = CheckinRepo::list_for_bet(&pool, bet.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].week_number, 1);
    assert!(!rows[0].completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_bet_insufficient_balance_writes_nothing(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    for _ in 0..2 {
        new_bet(&pool, p.id, 500, 2).await;
    }
    assert_eq!(balance(&pool, p.id).await, 0);

    let err = LedgerRepo::create_bet(&pool, p.id, &bet_input(10, 2), start())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LedgerError::Rejected(CoreError::InsufficientBalance {
            required: 10,
            available: 0
        })
    );
    let bets = BetRepo::list_for_user(&pool, p.id, None, 50, 0).await.unwrap();
    assert_eq!(bets.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_bet_rejects_invalid_terms(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let err = LedgerRepo::create_bet(&pool, p.id, &bet_input(5, 4), start())
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Validation(_)));
    assert_eq!(balance(&pool, p.id).await, 1000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_bet_defaults_buddy_relationship(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let input = CreateBet {
        buddy_email: Some("pal@example.com".into()),
        ..bet_input(50, 3)
    };
    let bet = LedgerRepo::create_bet(&pool, p.id, &input, start()).await.unwrap();
    assert_eq!(bet.buddy_relationship.as_deref(), Some("friend"));
}

// ---------------------------------------------------------------------------
// Check-ins and winning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkin_advances_week(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 50, 3).await;

    let outcome = LedgerRepo::checkin_week(&pool, p.id, bet.id, true, during_week(1))
        .await
        .unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.completed_week, 1);
    assert_eq!(outcome.bet.current_week, 2);
    assert!(outcome.checkin.completed);
    // No buddy email on this bet, so nobody was notified.
    assert!(!outcome.checkin.buddy_notified);

    let week2 = CheckinRepo::find_for_week(&pool, bet.id, 2).await.unwrap().unwrap();
    assert!(!week2.completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkin_rejects_early_and_late(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 50, 3).await;

    LedgerRepo::checkin_week(&pool, p.id, bet.id, false, during_week(1))
        .await
        .unwrap();

    // Week 2 has not started on day 1.
    let early = LedgerRepo::checkin_week(&pool, p.id, bet.id, false, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(early, LedgerError::Rejected(CoreError::Conflict(_)));

    // Past the week 2 deadline.
    let late = LedgerRepo::checkin_week(&pool, p.id, bet.id, false, during_week(4))
        .await
        .unwrap_err();
    assert_matches!(late, LedgerError::Rejected(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checkin_by_non_owner_forbidden(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let other = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 50, 2).await;

    let err = LedgerRepo::checkin_week(&pool, other.id, bet.id, false, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_final_checkin_wins_and_pays_supporters(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let fan = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 100, 2).await;

    LedgerRepo::support_bet(&pool, fan.id, bet.id, 40, during_week(1))
        .await
        .unwrap();
    assert_eq!(balance(&pool, fan.id).await, 960);

    LedgerRepo::checkin_week(&pool, owner.id, bet.id, false, during_week(1))
        .await
        .unwrap();
    let outcome = LedgerRepo::checkin_week(&pool, owner.id, bet.id, false, during_week(2))
        .await
        .unwrap();

    assert!(outcome.won);
    assert_eq!(outcome.payout, Some(200));
    assert_eq!(outcome.bet.status, "won");
    assert!(outcome.bet.completed_at.is_some());

    // 1000 - 100 stake + 100 * 2 payout
    assert_eq!(balance(&pool, owner.id).await, 1100);
    // 1000 - 40 stake + 40 * 2 payout
    assert_eq!(balance(&pool, fan.id).await, 1040);
    assert_conserved(&pool, owner.id).await;
    assert_conserved(&pool, fan.id).await;

    let supports = SupportRepo::list_for_bet(&pool, bet.id).await.unwrap();
    assert_eq!(supports[0].payout_amount, Some(80));

    let feed = WallEventRepo::list_feed(&pool, 1, 0).await.unwrap();
    assert_eq!(feed[0].event_type, "bet_won");
    assert_eq!(feed[0].metadata["payout"], 200);
    assert_eq!(feed[0].metadata["supporters"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_halfway_checkin_posts_milestone(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 50, 4).await;

    for week in 1..=2 {
        LedgerRepo::checkin_week(&pool, p.id, bet.id, false, during_week(week))
            .await
            .unwrap();
    }

    let feed = WallEventRepo::list_feed(&pool, 1, 0).await.unwrap();
    assert_eq!(feed[0].event_type, "milestone");
    assert_eq!(feed[0].bet_id, Some(bet.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_win_requires_all_weeks(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 50, 2).await;

    let err = LedgerRepo::resolve_bet_win(&pool, bet.id, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Conflict(_)));
    assert_eq!(balance(&pool, p.id).await, 950);
}

// ---------------------------------------------------------------------------
// Losing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_loss_is_idempotent(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let fan = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 100, 3).await;
    LedgerRepo::support_bet(&pool, fan.id, bet.id, 30, during_week(1))
        .await
        .unwrap();

    let first = LedgerRepo::resolve_bet_loss(&pool, bet.id, during_week(3))
        .await
        .unwrap();
    assert!(first.was_resolved());
    assert_eq!(first.bet().status, "lost");

    let second = LedgerRepo::resolve_bet_loss(&pool, bet.id, during_week(3))
        .await
        .unwrap();
    assert_matches!(second, Resolution::AlreadyResolved(_));

    assert_eq!(balance(&pool, owner.id).await, 900);
    assert_eq!(balance(&pool, fan.id).await, 970);
    let supports = SupportRepo::list_for_bet(&pool, bet.id).await.unwrap();
    assert_eq!(supports[0].payout_amount, Some(0));

    let lost_events: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM wall_events WHERE event_type = 'bet_lost'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(lost_events.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lost_bet_rejects_checkin_and_win(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 50, 2).await;
    LedgerRepo::resolve_bet_loss(&pool, bet.id, during_week(3))
        .await
        .unwrap();

    let err = LedgerRepo::checkin_week(&pool, p.id, bet.id, false, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Conflict(_)));

    let win = LedgerRepo::resolve_bet_win(&pool, bet.id, during_week(3))
        .await
        .unwrap();
    assert_matches!(win, Resolution::AlreadyResolved(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_loss_skips_week_checked_in_after_snapshot(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 100, 3).await;
    let deadline = start() + Duration::days(7);
    let sweep_time = deadline + Duration::seconds(1);

    // What the sweep sees before resolving: week 1 overdue and pending.
    let snapshot = BetRepo::find_by_id(&pool, bet.id).await.unwrap().unwrap();
    assert_eq!(snapshot.current_week, 1);
    let row = CheckinRepo::find_for_week(&pool, bet.id, 1)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.completed);

    // The owner checks in exactly at the deadline before the sweep resolves.
    LedgerRepo::checkin_week(&pool, p.id, bet.id, false, deadline)
        .await
        .unwrap();

    let resolution = LedgerRepo::resolve_bet_loss(&pool, bet.id, sweep_time)
        .await
        .unwrap();
    assert_matches!(resolution, Resolution::NotDue(_));
    assert_eq!(resolution.bet().status, "active");
    assert_eq!(resolution.bet().current_week, 2);

    let bet = BetRepo::find_by_id(&pool, bet.id).await.unwrap().unwrap();
    assert_eq!(bet.status, "active");
    assert_eq!(balance(&pool, p.id).await, 900);
    assert_conserved(&pool, p.id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_loss_not_due_before_deadline(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let bet = new_bet(&pool, p.id, 100, 3).await;
    let deadline = start() + Duration::days(7);

    let resolution = LedgerRepo::resolve_bet_loss(&pool, bet.id, deadline)
        .await
        .unwrap();
    assert_matches!(resolution, Resolution::NotDue(_));
    assert_eq!(resolution.bet().status, "active");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_loss_resolutions_resolve_once(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let fan = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 100, 3).await;
    LedgerRepo::support_bet(&pool, fan.id, bet.id, 40, during_week(1))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        LedgerRepo::resolve_bet_loss(&pool, bet.id, during_week(3)),
        LedgerRepo::resolve_bet_loss(&pool, bet.id, during_week(3)),
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    assert_eq!(outcomes.iter().filter(|r| r.was_resolved()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Resolution::AlreadyResolved(_))));

    let lost_events: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM wall_events WHERE event_type = 'bet_lost' AND bet_id = $1",
    )
    .bind(bet.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(lost_events.0, 1);

    assert_eq!(balance(&pool, owner.id).await, 900);
    assert_eq!(balance(&pool, fan.id).await, 960);
    assert_conserved(&pool, owner.id).await;
    assert_conserved(&pool, fan.id).await;
}

// ---------------------------------------------------------------------------
// Supports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_support_rules(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let fan = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 50, 4).await;

    let own = LedgerRepo::support_bet(&pool, owner.id, bet.id, 20, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(own, LedgerError::Rejected(CoreError::Validation(_)));

    let too_big = LedgerRepo::support_bet(&pool, fan.id, bet.id, 501, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(too_big, LedgerError::Rejected(CoreError::Validation(_)));

    LedgerRepo::support_bet(&pool, fan.id, bet.id, 20, during_week(1))
        .await
        .unwrap();
    let twice = LedgerRepo::support_bet(&pool, fan.id, bet.id, 20, during_week(1))
        .await
        .unwrap_err();
    assert_matches!(twice, LedgerError::Rejected(CoreError::Conflict(_)));
    assert_conserved(&pool, fan.id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_support_window_closes_after_two_weeks(pool: PgPool) {
    let owner = new_profile(&pool, "ada@example.com").await;
    let fan = new_profile(&pool, "bob@example.com").await;
    let bet = new_bet(&pool, owner.id, 50, 4).await;

    let err = LedgerRepo::support_bet(&pool, fan.id, bet.id, 20, start() + Duration::days(14))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Conflict(msg)) if msg.contains("older than 2 weeks"));
    assert_eq!(balance(&pool, fan.id).await, 1000);
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

async fn avatar_id(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("SELECT id FROM avatars WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn collectible_id(pool: &PgPool, name: &str) -> DbId {
    sqlx::query_scalar("SELECT id FROM collectibles WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purchase_and_activate_avatar(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let fox = avatar_id(&pool, "Fox").await;

    let not_owned = LedgerRepo::set_active_avatar(&pool, p.id, fox).await.unwrap_err();
    assert_matches!(not_owned, LedgerError::Rejected(CoreError::Forbidden(_)));

    let after = LedgerRepo::purchase_avatar(&pool, p.id, fox).await.unwrap();
    assert_eq!(after.balance, 850);

    let again = LedgerRepo::purchase_avatar(&pool, p.id, fox).await.unwrap_err();
    assert_matches!(again, LedgerError::Rejected(CoreError::Conflict(_)));

    let active = LedgerRepo::set_active_avatar(&pool, p.id, fox).await.unwrap();
    assert_eq!(active.active_avatar_id, Some(fox));

    let listings = CosmeticRepo::list_avatar_listings(&pool, p.id).await.unwrap();
    let listing = listings.iter().find(|a| a.id == fox).unwrap();
    assert!(listing.owned && listing.active);
    assert_conserved(&pool, p.id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_premium_avatar_not_for_sale(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let unicorn = avatar_id(&pool, "Unicorn").await;

    let err = LedgerRepo::purchase_avatar(&pool, p.id, unicorn).await.unwrap_err();
    assert_matches!(err, LedgerError::Rejected(CoreError::Forbidden(_)));

    let listings = CosmeticRepo::list_avatar_listings(&pool, p.id).await.unwrap();
    assert!(listings.iter().all(|a| a.id != unicorn));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_free_avatar_writes_no_ledger_row(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let chick = avatar_id(&pool, "Chick").await;

    let after = LedgerRepo::purchase_avatar(&pool, p.id, chick).await.unwrap();
    assert_eq!(after.balance, 1000);
    let entries = CoinLedgerRepo::list_for_profile(&pool, p.id, 50, 0).await.unwrap();
    assert_eq!(entries.len(), 1, "only the signup grant");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collectible_purchase_needs_funds(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;

    let castle = collectible_id(&pool, "Castle").await;
    let err = LedgerRepo::purchase_collectible(&pool, p.id, castle)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LedgerError::Rejected(CoreError::InsufficientBalance {
            required: 20000,
            available: 1000
        })
    );

    let cap = collectible_id(&pool, "Cap").await;
    let after = LedgerRepo::purchase_collectible(&pool, p.id, cap).await.unwrap();
    assert_eq!(after.balance, 900);

    let listings = CosmeticRepo::list_collectible_listings(&pool, p.id).await.unwrap();
    assert!(listings.iter().find(|c| c.id == cap).unwrap().owned);
    assert!(!listings.iter().find(|c| c.id == castle).unwrap().owned);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_items_not_found(pool: PgPool) {
    let p = new_profile(&pool, "ada@example.com").await;
    let err = LedgerRepo::purchase_collectible(&pool, p.id, 9999)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        LedgerError::Rejected(CoreError::NotFound {
            entity: "Collectible",
            ..
        })
    );
}
