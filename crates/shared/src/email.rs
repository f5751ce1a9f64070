//! Outbound email.
//!
//! Callers hand a finished [`OutboundEmail`] to an [`EmailSender`] and move on.
//! Delivery happens on a detached task; nothing in the request path waits for it.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::EmailConfig;

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

/// A plain-text message ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutboundEmail {
    /// Builds the verification-code email.
    #[must_use]
    pub fn verification_code(app_name: &str, to: &str, code: &str, ttl_minutes: u64) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("Verify your email for {app_name}"),
            body: format!(
                "Thank you for signing up for {app_name}!\n\n\
                 Your verification code is: {code}\n\n\
                 This code expires in {ttl_minutes} minutes.\n\n\
                 If you didn't create an account, please ignore this email."
            ),
        }
    }
}

/// Fire-and-forget email delivery.
pub trait EmailSender: Send + Sync {
    /// Queues the message for delivery and returns immediately.
    fn dispatch(&self, email: OutboundEmail);
}

/// SMTP sender backed by `lettre`.
#[derive(Debug, Clone)]
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    /// Creates a new SMTP sender.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    fn build_message(&self, email: &OutboundEmail) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends a message and waits for the relay's answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or the relay rejects it.
    pub async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        let message = self.build_message(email)?;
        let transport = self.create_transport()?;
        transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;
        Ok(())
    }
}

impl EmailSender for SmtpEmailSender {
    fn dispatch(&self, email: OutboundEmail) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(to = %email.to, "No async runtime available, email dropped");
            return;
        };

        let sender = self.clone();
        handle.spawn(async move {
            match sender.send(&email).await {
                Ok(()) => info!(to = %email.to, subject = %email.subject, "Email sent"),
                Err(e) => error!(to = %email.to, error = %e, "Failed to send email"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_contents() {
        let email = OutboundEmail::verification_code("Ledgerly", "a@example.com", "123456", 15);
        assert_eq!(email.to, "a@example.com");
        assert_eq!(email.subject, "Verify your email for Ledgerly");
        assert!(email.body.contains("Your verification code is: 123456"));
        assert!(email.body.contains("expires in 15 minutes"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        let email = OutboundEmail {
            to: "not an address".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(
            sender.build_message(&email),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_build_message_ok() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        let email = OutboundEmail::verification_code("Ledgerly", "a@example.com", "654321", 15);
        assert!(sender.build_message(&email).is_ok());
    }

    #[test]
    fn test_dispatch_without_runtime_does_not_panic() {
        let sender = SmtpEmailSender::new(EmailConfig::default());
        sender.dispatch(OutboundEmail::verification_code(
            "Ledgerly",
            "a@example.com",
            "111111",
            15,
        ));
    }
}
