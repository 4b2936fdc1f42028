use habitstake_notify::buddy::DEFAULT_APP_URL;

use crate::auth::jwt::JwtConfig;

/// Default deadline sweep period: once a day.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 86_400;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deployment environment name (default: `development`).
    pub app_env: String,
    /// Shared secret the cron caller presents as a Bearer token in production.
    pub cron_secret: Option<String>,
    /// In-process deadline sweep settings.
    pub sweep: SweepConfig,
    /// Public URL of the app, linked from emails.
    pub app_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Settings for the in-process deadline sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Whether the server runs the sweep itself (default: `false`).
    pub enabled: bool,
    /// Seconds between runs (default: `86400`).
    pub interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `development`              |
    /// | `CRON_SECRET`          | --                         |
    /// | `SWEEP_ENABLED`        | `false`                    |
    /// | `SWEEP_INTERVAL_SECS`  | `86400`                    |
    /// | `APP_URL`              | `https://betonyou.app`     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let cron_secret = std::env::var("CRON_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let sweep = SweepConfig {
            enabled: std::env::var("SWEEP_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .map_or(Some(DEFAULT_SWEEP_INTERVAL_SECS), |v| parse_interval_secs(&v))
                .expect("SWEEP_INTERVAL_SECS must be a positive integer"),
        };

        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_env,
            cron_secret,
            sweep,
            app_url,
            jwt,
        }
    }

    /// Whether the server runs in production, where cron calls must
    /// authenticate.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

/// A timer period in whole seconds. `tokio::time::interval` panics on zero.
fn parse_interval_secs(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|&secs| secs > 0)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
