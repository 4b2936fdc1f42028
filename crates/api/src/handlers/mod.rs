pub mod auth;
pub mod bets;
pub mod cron;
pub mod email;
pub mod profile;
pub mod shop;
pub mod supports;
pub mod wall;
