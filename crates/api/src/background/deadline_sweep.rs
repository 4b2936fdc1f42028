//! Weekly deadline sweep.
//!
//! Marks every active bet whose current week's deadline has passed without a
//! completed check-in as lost. Bets are resolved one at a time; a failure on
//! one bet is logged and skipped so the rest of the sweep still runs, and the
//! bet is picked up again on the next run.

use std::time::Duration;

use chrono::Utc;
use habitstake_core::deadline::is_overdue;
use habitstake_core::types::Timestamp;
use habitstake_db::models::bet::{Bet, Resolution};
use habitstake_db::repositories::{BetRepo, CheckinRepo, LedgerRepo};
use habitstake_db::LedgerError;
use serde::Serialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Active bets examined.
    pub processed: usize,
    /// Bets this run marked as lost.
    pub lost: usize,
}

impl SweepReport {
    /// Summary line reported to the cron caller.
    pub fn message(&self) -> String {
        if self.processed == 0 {
            "No active bets found".to_string()
        } else {
            format!(
                "Processed {} active bets, {} marked as lost",
                self.processed, self.lost
            )
        }
    }
}

/// Run one sweep over all active bets as of `now`.
///
/// Fails only if the active bets cannot be listed.
pub async fn sweep_once(pool: &PgPool, now: Timestamp) -> Result<SweepReport, sqlx::Error> {
    let bets = BetRepo::list_active(pool).await?;
    let mut lost = 0;

    for bet in &bets {
        match sweep_bet(pool, bet, now).await {
            Ok(true) => lost += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(bet_id = bet.id, error = %e, "Deadline sweep: resolution failed");
            }
        }
    }

    let report = SweepReport {
        processed: bets.len(),
        lost,
    };
    tracing::info!(
        processed = report.processed,
        lost = report.lost,
        "Deadline sweep finished"
    );
    Ok(report)
}

/// Resolve a single bet if its deadline passed. Returns whether this call
/// marked it lost.
///
/// The snapshot checks here only skip bets that are plainly not due;
/// `resolve_bet_loss` repeats them under the bet lock.
async fn sweep_bet(pool: &PgPool, bet: &Bet, now: Timestamp) -> Result<bool, LedgerError> {
    if !is_overdue(bet.started_at, bet.current_week, now) {
        return Ok(false);
    }

    let pending = CheckinRepo::find_for_week(pool, bet.id, bet.current_week)
        .await?
        .is_some_and(|row| !row.completed);
    if !pending {
        return Ok(false);
    }

    match LedgerRepo::resolve_bet_loss(pool, bet.id, now).await? {
        Resolution::Resolved(_) => Ok(true),
        Resolution::AlreadyResolved(_) => {
            tracing::debug!(bet_id = bet.id, "Deadline sweep: bet already resolved");
            Ok(false)
        }
        Resolution::NotDue(_) => {
            tracing::debug!(bet_id = bet.id, "Deadline sweep: checked in before resolution");
            Ok(false)
        }
    }
}

/// Run the sweep every `interval` until `cancel` is triggered.
///
/// The first run happens immediately.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Deadline sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Deadline sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = sweep_once(&pool, Utc::now()).await {
                    tracing::error!(error = %e, "Deadline sweep: failed to list active bets");
                }
            }
        }
    }
}
