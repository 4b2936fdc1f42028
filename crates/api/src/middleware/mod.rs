//! Request extractors that authenticate callers.
//!
//! - [`auth::AuthUser`] -- the profile behind a JWT Bearer token.
//! - [`cron::CronCaller`] -- a scheduler presenting the cron secret.

pub mod auth;
pub mod cron;
