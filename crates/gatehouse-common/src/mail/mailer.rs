//! Retrying mailer and message templates

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::transport::{MailError, MailMessage, MailTransport};
use crate::config::MailConfig;
use crate::error::Fault;

/// Fixed-delay retry policy with a per-attempt timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&MailConfig> for RetryPolicy {
    fn from(config: &MailConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.retry_delay_ms),
            attempt_timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Renders and delivers account emails
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    sender: String,
    public_url: String,
    policy: RetryPolicy,
}

impl Mailer {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        sender: impl Into<String>,
        public_url: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Link that activates the given account
    pub fn activation_link(&self, user_id: &str) -> String {
        format!("{}/api/v1/auth/activate/{user_id}", self.public_url)
    }

    /// Deliver a message, retrying failed attempts.
    ///
    /// Every attempt is bounded by the policy's timeout. When all attempts
    /// fail the last error is surfaced as a `MailerError` fault.
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn deliver(&self, message: &MailMessage) -> Result<(), Fault> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let outcome =
                match tokio::time::timeout(self.policy.attempt_timeout, self.transport.send(message))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(MailError::Timeout(self.policy.attempt_timeout)),
                };

            match outcome {
                Ok(()) => {
                    info!(attempt, "Email delivered");
                    return Ok(());
                }
                Err(e) => {
                    warn!(attempt, max_attempts = attempts, error = %e, "Email delivery attempt failed");
                    last_error = Some(e);
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        let fault = Fault::mailer("failed to deliver email");
        Err(match last_error {
            Some(e) => fault.with_source(e),
            None => fault,
        })
    }

    /// Send the account activation link
    pub async fn send_activation(&self, to: &str, name: &str, user_id: &str) -> Result<(), Fault> {
        let link = self.activation_link(user_id);
        let html = format!(
            "<p>Hi {},</p>\
             <p>Welcome aboard. Confirm your account by opening the link below:</p>\
             <p><a href=\"{link}\">{link}</a></p>",
            escape_html(name),
        );

        self.deliver(&MailMessage {
            from: self.sender.clone(),
            to: to.to_string(),
            subject: "Activate your account".to_string(),
            html,
        })
        .await
    }

    /// Send a one-time login code
    pub async fn send_code(&self, to: &str, name: &str, code: &str) -> Result<(), Fault> {
        let html = format!(
            "<p>Hi {},</p>\
             <p>Your login code is <strong>{code}</strong>.</p>\
             <p>It expires in 3 minutes. If you did not request it, ignore this message.</p>",
            escape_html(name),
        );

        self.deliver(&MailMessage {
            from: self.sender.clone(),
            to: to.to_string(),
            subject: "Your login code".to_string(),
            html,
        })
        .await
    }
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("sender", &self.sender)
            .field("public_url", &self.public_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
