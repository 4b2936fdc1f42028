use async_trait::async_trait;
use serde::Serialize;

use crate::error::MailError;

/// A fully rendered HTML email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// A channel that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the email and return the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError>;
}
