//! Delivery channels implementing [`Mailer`](crate::Mailer).

pub mod resend;
pub mod smtp;
