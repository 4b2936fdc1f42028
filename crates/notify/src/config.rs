//! Mail channel selection from environment variables.
//!
//! If `RESEND_API_KEY` is set the Resend HTTP API is used; otherwise, if
//! `SMTP_HOST` is set, mail goes through SMTP. With neither,
//! [`MailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use std::sync::Arc;

use crate::delivery::resend::ResendMailer;
use crate::delivery::smtp::SmtpMailer;
use crate::error::MailError;
use crate::mailer::Mailer;

/// Default sender when `MAIL_FROM` is not set.
pub const DEFAULT_FROM_ADDRESS: &str = "Bet On Yourself <notifications@betonyou.app>";

/// Default Resend API base URL.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    Resend { api_key: String, api_url: String },
    Smtp(SmtpConfig),
}

/// Outbound mail configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// RFC 5322 "From" address, display name allowed.
    pub from_address: String,
    pub transport: MailTransport,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable         | Required             | Default                                        |
    /// |------------------|----------------------|------------------------------------------------|
    /// | `RESEND_API_KEY` | one of these two     | --                                             |
    /// | `SMTP_HOST`      | one of these two     | --                                             |
    /// | `RESEND_API_URL` | no                   | `https://api.resend.com`                       |
    /// | `SMTP_PORT`      | no                   | `587`                                          |
    /// | `SMTP_USER`      | no                   | --                                             |
    /// | `SMTP_PASSWORD`  | no                   | --                                             |
    /// | `MAIL_FROM`      | no                   | `Bet On Yourself <notifications@betonyou.app>` |
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let transport = if let Some(api_key) = non_empty("RESEND_API_KEY") {
            MailTransport::Resend {
                api_key,
                api_url: non_empty("RESEND_API_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            }
        } else {
            MailTransport::Smtp(SmtpConfig {
                host: non_empty("SMTP_HOST")?,
                port: non_empty("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: non_empty("SMTP_USER"),
                password: non_empty("SMTP_PASSWORD"),
            })
        };

        Some(Self {
            from_address: non_empty("MAIL_FROM")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            transport,
        })
    }

    /// Build the mailer for the configured channel.
    pub fn build_mailer(&self) -> Result<Arc<dyn Mailer>, MailError> {
        let mailer: Arc<dyn Mailer> = match &self.transport {
            MailTransport::Resend { api_key, api_url } => {
                Arc::new(ResendMailer::new(api_key.clone(), api_url.clone())?)
            }
            MailTransport::Smtp(smtp) => Arc::new(SmtpMailer::new(smtp.clone())?),
        };
        Ok(mailer)
    }
}
