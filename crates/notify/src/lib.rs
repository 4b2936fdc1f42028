//! Outbound email for Habitstake.
//!
//! - [`buddy`] renders the accountability-buddy check-in email.
//! - [`mailer`] defines the [`Mailer`] trait every delivery channel
//!   implements.
//! - [`delivery`] holds the Resend HTTP API and SMTP implementations.
//! - [`config`] selects a channel from environment variables.

pub mod buddy;
pub mod config;
pub mod delivery;
pub mod error;
pub mod mailer;

pub use config::MailConfig;
pub use error::MailError;
pub use mailer::{Mailer, OutgoingEmail};
