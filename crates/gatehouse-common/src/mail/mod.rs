//! Outbound mail delivery
//!
//! A [`MailTransport`] performs a single delivery attempt; the [`Mailer`]
//! wraps one with the retry policy and renders the message templates.

mod mailer;
mod transport;

pub use mailer::{Mailer, RetryPolicy};
pub use transport::{LogTransport, MailError, MailMessage, MailTransport, ResendTransport};
