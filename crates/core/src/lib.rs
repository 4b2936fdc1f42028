//! Habitstake domain rules.
//!
//! This crate has no IO and no internal dependencies so the rules for bets,
//! deadlines, supports, the coin ledger and the wall feed can be shared by the
//! repository layer, the HTTP layer and the background sweep alike.

pub mod bet;
pub mod bonus;
pub mod deadline;
pub mod error;
pub mod ledger;
pub mod pagination;
pub mod shop;
pub mod support;
pub mod types;
pub mod wall;
