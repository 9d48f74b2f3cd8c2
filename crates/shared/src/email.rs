//! Mail delivery for member notifications.
//!
//! Uses `lettre` for SMTP transport. Callers depend on the
//! [`NotificationSender`] trait so tests and other transports can stand in.

use std::sync::Arc;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::EmailConfig;

/// SMTP submission port that expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutgoingMessage {
    /// Creates a new message.
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivers a rendered message to one recipient.
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    /// Sends `message` to `to`.
    async fn send(&self, to: &str, message: &OutgoingMessage) -> Result<(), EmailError>;
}

/// Sends a message on its own task. Failures are logged, never returned;
/// the handle resolves to whether the relay accepted the message.
pub fn send_in_background(
    sender: Arc<dyn NotificationSender>,
    to: String,
    message: OutgoingMessage,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        match sender.send(&to, &message).await {
            Ok(()) => {
                tracing::debug!(recipient = %to, "Notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(recipient = %to, error = %e, "Notification failed");
                false
            }
        }
    })
}

/// SMTP-backed notification sender.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    ///
    /// Port 465 uses implicit TLS, other ports upgrade with STARTTLS. A
    /// `localhost` relay is spoken to in plain text for local mail catchers.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let host = self.config.smtp_host.trim();
        let mut builder = if host.eq_ignore_ascii_case("localhost") {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        } else if self.config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
        }
        .port(self.config.smtp_port);

        if !self.config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ));
        }

        Ok(builder.build())
    }

    /// Builds the MIME message for one recipient.
    fn build_message(
        &self,
        to_email: &str,
        message: &OutgoingMessage,
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .trim()
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl NotificationSender for EmailService {
    async fn send(&self, to: &str, message: &OutgoingMessage) -> Result<(), EmailError> {
        let email = self.build_message(to, message)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
