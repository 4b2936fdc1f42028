//! Coin ledger reasons and balance rules.
//!
//! Every balance change is recorded in `coin_ledger` with one of the
//! [`LedgerReason`] values below, so a profile's balance always equals the
//! sum of its ledger deltas.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Coins;

/// Coins granted to every new profile.
pub const SIGNUP_GRANT: Coins = 1000;

/// Why a balance changed. Stored as text in `coin_ledger.reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerReason {
    SignupGrant,
    BetStake,
    BetPayout,
    SupportStake,
    SupportPayout,
    LoginBonus,
    AvatarPurchase,
    CollectiblePurchase,
}

impl LedgerReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignupGrant => "signup_grant",
            Self::BetStake => "bet_stake",
            Self::BetPayout => "bet_payout",
            Self::SupportStake => "support_stake",
            Self::SupportPayout => "support_payout",
            Self::LoginBonus => "login_bonus",
            Self::AvatarPurchase => "avatar_purchase",
            Self::CollectiblePurchase => "collectible_purchase",
        }
    }

    /// Whether entries with this reason take coins away from the profile.
    pub fn is_debit(self) -> bool {
        matches!(
            self,
            Self::BetStake | Self::SupportStake | Self::AvatarPurchase | Self::CollectiblePurchase
        )
    }

    /// Signed delta for an amount moved for this reason.
    pub fn signed(self, amount: Coins) -> Coins {
        if self.is_debit() {
            -amount
        } else {
            amount
        }
    }
}

/// Ensure `balance` covers `required`.
pub fn ensure_affordable(balance: Coins, required: Coins) -> Result<(), CoreError> {
    if balance < required {
        return Err(CoreError::InsufficientBalance {
            required,
            available: balance,
        });
    }
    Ok(())
}
