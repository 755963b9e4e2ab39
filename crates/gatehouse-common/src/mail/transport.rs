//! Mail transports

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Single-attempt delivery failures
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("mail delivery timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Performs one delivery attempt
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Delivers through the Resend HTTP API
#[derive(Clone)]
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl ResendTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: RESEND_ENDPOINT.to_string(),
        }
    }

    /// Point the transport at another endpoint (e.g. a local mock)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for ResendTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendTransport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let payload = ResendPayload {
            from: &message.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Writes messages to the log instead of sending them. Used when no mail
/// provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.html,
            "Mail provider not configured; logging message"
        );
        Ok(())
    }
}
