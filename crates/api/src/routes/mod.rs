pub mod auth;
pub mod bets;
pub mod cron;
pub mod email;
pub mod health;
pub mod profile;
pub mod shop;
pub mod wall;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                            register (public)
/// /auth/login                               login (public)
///
/// /profile                                  current profile
/// /profile/login-bonus                      claim daily bonus (POST)
/// /profile/ledger                           coin ledger history
/// /profile/stats                            bet record and owned cosmetics
///
/// /bets                                     list own bets, create
/// /bets/{id}                                bet detail
/// /bets/{id}/checkin                        weekly check-in (POST)
/// /bets/{id}/support                        eligibility (GET), support (POST)
///
/// /shop/avatars                             avatar listings
/// /shop/avatars/{id}/purchase               buy avatar (POST)
/// /shop/avatars/{id}/activate               set active avatar (POST)
/// /shop/collectibles                        collectible listings
/// /shop/collectibles/{id}/purchase          buy collectible (POST)
///
/// /wall                                     public feed
///
/// /cron/check-bets                          deadline sweep (cron secret)
/// /email/buddy                              buddy check-in email (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/bets", bets::router())
        .nest("/shop", shop::router())
        .nest("/wall", wall::router())
        // Scheduler-facing.
        .nest("/cron", cron::router())
        .nest("/email", email::router())
}
