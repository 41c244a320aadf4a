//! SMS delivery through the Twilio REST API.
//!
//! [`SmsDelivery`] posts a form-encoded message to the account's
//! `Messages.json` endpoint. If the Twilio variables are not all set,
//! [`SmsConfig::from_env`] returns `None` and the SMS channel is simulated.

use std::time::Duration;

/// Twilio REST API base URL.
const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Twilio answered with a non-2xx status code.
    #[error("Twilio returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Twilio credentials and sender number.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// E.164 sender number.
    pub from_number: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// All three variables are required; returns `None` if any is missing.
    ///
    /// | Variable             | Required |
    /// |----------------------|----------|
    /// | `TWILIO_ACCOUNT_SID` | yes      |
    /// | `TWILIO_AUTH_TOKEN`  | yes      |
    /// | `TWILIO_FROM_NUMBER` | yes      |
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_FROM_NUMBER")?,
        })
    }
}

// ---------------------------------------------------------------------------
// SmsDelivery
// ---------------------------------------------------------------------------

/// Sends text messages via Twilio.
pub struct SmsDelivery {
    config: SmsConfig,
    client: reqwest::Client,
    base_url: String,
}

impl SmsDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            config,
            client,
            base_url: TWILIO_API_BASE.to_string(),
        })
    }

    /// Send one message to `to_number`.
    pub async fn send(&self, to_number: &str, body: &str) -> Result<(), SmsError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        );
        let params = [
            ("To", to_number),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = to_number, "Notification SMS sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
