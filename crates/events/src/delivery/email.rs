//! Contractor email over SMTP (STARTTLS) using `lettre`.
//!
//! Without `SMTP_HOST` the channel is off and the dispatcher records the
//! email as simulated.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@bluetape.local";

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Headers or body were rejected while assembling the message.
    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

/// SMTP relay settings.
///
/// Read from `SMTP_HOST`, `SMTP_PORT` (587), `SMTP_FROM`, `SMTP_USER` and
/// `SMTP_PASSWORD`. Credentials are only sent when both are present.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// `None` when `SMTP_HOST` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let smtp_host = var("SMTP_HOST")?;
        Some(Self {
            smtp_host,
            smtp_port: var("SMTP_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: var("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: var("SMTP_USER"),
            smtp_password: var("SMTP_PASSWORD"),
        })
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.smtp_user, &self.smtp_password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        }
    }
}

pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Assemble a plain-text message. Addresses are validated here, before
    /// any connection is attempted.
    fn compose(&self, to: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from: Mailbox = self.config.from_address.parse()?;
        let to: Mailbox = to.parse()?;
        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
            .port(self.config.smtp_port);
        if let Some(credentials) = self.config.credentials() {
            builder = builder.credentials(credentials);
        }
        Ok(builder.build())
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let message = self.compose(to, subject, body)?;
        self.transport()?.send(message).await?;
        tracing::info!(to, subject, "Contractor email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn delivery(from: &str) -> EmailDelivery {
        EmailDelivery::new(EmailConfig {
            smtp_host: "smtp.invalid".to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_address: from.to_string(),
            smtp_user: Some("user".to_string()),
            smtp_password: None,
        })
    }

    #[test]
    fn credentials_need_user_and_password() {
        let d = delivery(DEFAULT_FROM_ADDRESS);
        assert!(d.config.credentials().is_none());
    }

    #[test]
    fn compose_rejects_bad_sender() {
        let err = delivery("nobody").compose("sub@example.com", "s", "b").unwrap_err();
        assert_matches!(err, EmailError::Address(_));
    }

    #[test]
    fn compose_builds_plain_text_message() {
        let message = delivery(DEFAULT_FROM_ADDRESS)
            .compose("sub@example.com", "[HIGH] New Issue - Maple Court", "Fix the trim")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: sub@example.com"));
        assert!(raw.contains("Subject: [HIGH] New Issue - Maple Court"));
        assert!(raw.contains("Fix the trim"));
    }

    #[tokio::test]
    async fn bad_recipient_fails_before_connecting() {
        let err = delivery(DEFAULT_FROM_ADDRESS)
            .send("not-an-email", "s", "b")
            .await
            .unwrap_err();
        assert_matches!(err, EmailError::Address(_));
    }
}
