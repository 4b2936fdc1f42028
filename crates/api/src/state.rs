use std::sync::Arc;

use habitstake_notify::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: habitstake_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound mail; `None` when no mail provider is configured.
    pub mail: Option<MailHandle>,
}

/// A configured mail channel plus the sender address it uses.
#[derive(Clone)]
pub struct MailHandle {
    pub mailer: Arc<dyn Mailer>,
    pub from: String,
}
