//! Contractor notification dispatch over email and SMS.
//!
//! Each channel is attempted independently. A channel without configuration
//! is simulated: the message is logged and reported as `simulated`. A channel
//! the contractor has no address for is left out of the receipt entirely.

use bluetape_core::contact::ContactChannels;
use bluetape_core::status::IssuePriority;
use bluetape_core::types::DbId;
use serde::Serialize;

use crate::delivery::email::{EmailConfig, EmailDelivery};
use crate::delivery::sms::{SmsConfig, SmsDelivery, SmsError};

/// Area label used when an issue has no area.
pub const UNKNOWN_AREA: &str = "Unknown";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which channels are live. `None` means the channel is simulated.
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub email: Option<EmailConfig>,
    pub sms: Option<SmsConfig>,
}

impl NotificationConfig {
    /// Load both channel configurations from the environment.
    pub fn from_env() -> Self {
        Self {
            email: EmailConfig::from_env(),
            sms: SmsConfig::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Everything needed to tell a contractor about one issue.
#[derive(Debug, Clone)]
pub struct IssueNotice {
    pub issue_id: DbId,
    pub project_name: String,
    pub project_address: String,
    pub area_name: Option<String>,
    pub description: Option<String>,
    pub priority: IssuePriority,
    pub photo_urls: Vec<String>,
    pub recipient: ContactChannels,
}

/// A pending-work reminder for one contractor on one project.
#[derive(Debug, Clone)]
pub struct ReminderNotice {
    pub project_name: String,
    pub pending_count: i64,
    pub recipient: ContactChannels,
}

/// Result of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Sent,
    Simulated,
    Failed { error: String },
}

impl ChannelOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-channel outcomes. A channel is absent when there was no address for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub email: Option<ChannelOutcome>,
    pub sms: Option<ChannelOutcome>,
}

impl DispatchReceipt {
    /// True when at least one attempted channel did not fail.
    pub fn any_delivered(&self) -> bool {
        [&self.email, &self.sms]
            .into_iter()
            .flatten()
            .any(|outcome| !outcome.is_failed())
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

pub fn issue_email_subject(notice: &IssueNotice) -> String {
    format!(
        "[{}] New Issue - {}",
        notice.priority.bucket_label(),
        notice.project_name
    )
}

pub fn issue_email_body(notice: &IssueNotice) -> String {
    let area = notice.area_name.as_deref().unwrap_or(UNKNOWN_AREA);
    let description = notice
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description provided");

    let mut body = format!(
        "New issue assigned to you:\n\n\
         Project: {}\n\
         Address: {}\n\
         Area: {area}\n\
         Priority: {}\n\n\
         Description:\n{description}\n\n",
        notice.project_name,
        notice.project_address,
        notice.priority.bucket_label(),
    );
    if !notice.photo_urls.is_empty() {
        body.push_str("Photos:\n");
        for url in &notice.photo_urls {
            body.push_str(url);
            body.push('\n');
        }
        body.push('\n');
    }
    body.push_str(&format!(
        "Issue ID: #{}\n\nPlease address this issue at your earliest convenience.",
        notice.issue_id
    ));
    body
}

pub fn issue_sms_text(app_name: &str, notice: &IssueNotice) -> String {
    format!(
        "[{app_name}] New {} issue at {} - {}. Issue #{}",
        notice.priority,
        notice.project_name,
        notice.area_name.as_deref().unwrap_or(UNKNOWN_AREA),
        notice.issue_id
    )
}

pub fn reminder_subject(notice: &ReminderNotice) -> String {
    format!(
        "Reminder: {} pending issues - {}",
        notice.pending_count, notice.project_name
    )
}

pub fn reminder_body(notice: &ReminderNotice) -> String {
    format!(
        "You have {} pending issue(s) at {}. Please review and complete them.",
        notice.pending_count, notice.project_name
    )
}

pub fn reminder_sms_text(app_name: &str, notice: &ReminderNotice) -> String {
    format!(
        "[{app_name}] Reminder: {} pending issue(s) at {}.",
        notice.pending_count, notice.project_name
    )
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Sends contractor notifications over the configured channels.
pub struct NotificationDispatcher {
    email: Option<EmailDelivery>,
    sms: Option<SmsDelivery>,
    app_name: String,
}

impl NotificationDispatcher {
    /// Build a dispatcher. Fails only if the SMS HTTP client cannot be built.
    pub fn new(config: NotificationConfig, app_name: impl Into<String>) -> Result<Self, SmsError> {
        let sms = config.sms.map(SmsDelivery::new).transpose()?;
        let dispatcher = Self {
            email: config.email.map(EmailDelivery::new),
            sms,
            app_name: app_name.into(),
        };
        tracing::info!(
            email_enabled = dispatcher.email.is_some(),
            sms_enabled = dispatcher.sms.is_some(),
            "Notification dispatcher ready"
        );
        Ok(dispatcher)
    }

    /// Notify a contractor about a single issue.
    pub async fn send_issue_notification(&self, notice: &IssueNotice) -> DispatchReceipt {
        let subject = issue_email_subject(notice);
        let body = issue_email_body(notice);
        let text = issue_sms_text(&self.app_name, notice);

        let (email, sms) = tokio::join!(
            self.email_channel(notice.recipient.email.as_deref(), &subject, &body),
            self.sms_channel(notice.recipient.phone.as_deref(), &text),
        );
        DispatchReceipt { email, sms }
    }

    /// Remind a contractor of their pending issues on a project.
    pub async fn send_reminder(&self, notice: &ReminderNotice) -> DispatchReceipt {
        let subject = reminder_subject(notice);
        let body = reminder_body(notice);
        let text = reminder_sms_text(&self.app_name, notice);

        let (email, sms) = tokio::join!(
            self.email_channel(notice.recipient.email.as_deref(), &subject, &body),
            self.sms_channel(notice.recipient.phone.as_deref(), &text),
        );
        DispatchReceipt { email, sms }
    }

    async fn email_channel(&self, to: Option<&str>, subject: &str, body: &str) -> Option<ChannelOutcome> {
        let to = to?;
        let Some(email) = &self.email else {
            tracing::info!(to, subject, body, "Email not configured, simulating send");
            return Some(ChannelOutcome::Simulated);
        };
        Some(match email.send(to, subject, body).await {
            Ok(()) => ChannelOutcome::Sent,
            Err(e) => {
                tracing::warn!(to, error = %e, "Email notification failed");
                ChannelOutcome::Failed {
                    error: e.to_string(),
                }
            }
        })
    }

    async fn sms_channel(&self, to: Option<&str>, text: &str) -> Option<ChannelOutcome> {
        let to = to?;
        let Some(sms) = &self.sms else {
            tracing::info!(to, text, "SMS not configured, simulating send");
            return Some(ChannelOutcome::Simulated);
        };
        Some(match sms.send(to, text).await {
            Ok(()) => ChannelOutcome::Sent,
            Err(e) => {
                tracing::warn!(to, error = %e, "SMS notification failed");
                ChannelOutcome::Failed {
                    error: e.to_string(),
                }
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(email: Option<&str>, phone: Option<&str>) -> IssueNotice {
        IssueNotice {
            issue_id: 42,
            project_name: "Maple Court".to_string(),
            project_address: "5 Maple Ct".to_string(),
            area_name: Some("Kitchen".to_string()),
            description: None,
            priority: IssuePriority::High,
            photo_urls: vec![],
            recipient: ContactChannels {
                email: email.map(str::to_string),
                phone: phone.map(str::to_string),
            },
        }
    }

    #[test]
    fn email_subject_and_body() {
        let n = notice(Some("a@b.co"), None);
        assert_eq!(issue_email_subject(&n), "[HIGH] New Issue - Maple Court");

        let body = issue_email_body(&n);
        assert!(body.starts_with("New issue assigned to you:\n\nProject: Maple Court\n"));
        assert!(body.contains("Area: Kitchen\nPriority: HIGH\n"));
        assert!(body.contains("Description:\nNo description provided\n"));
        assert!(body.ends_with("Issue ID: #42\n\nPlease address this issue at your earliest convenience."));
        assert!(!body.contains("Photos:"));
    }

    #[test]
    fn email_body_lists_photos() {
        let mut n = notice(Some("a@b.co"), None);
        n.photo_urls = vec!["/uploads/photos/a.jpg".to_string()];
        assert!(issue_email_body(&n).contains("Photos:\n/uploads/photos/a.jpg\n"));
    }

    #[test]
    fn sms_text_uses_unknown_area() {
        let mut n = notice(None, Some("+15550100"));
        n.area_name = None;
        assert_eq!(
            issue_sms_text("Blue Tape", &n),
            "[Blue Tape] New high issue at Maple Court - Unknown. Issue #42"
        );
    }

    #[test]
    fn reminder_wording() {
        let r = ReminderNotice {
            project_name: "Maple Court".to_string(),
            pending_count: 3,
            recipient: ContactChannels {
                email: None,
                phone: None,
            },
        };
        assert_eq!(reminder_subject(&r), "Reminder: 3 pending issues - Maple Court");
        assert_eq!(
            reminder_body(&r),
            "You have 3 pending issue(s) at Maple Court. Please review and complete them."
        );
    }

    #[test]
    fn receipt_delivery_rule() {
        let failed = ChannelOutcome::Failed {
            error: "down".to_string(),
        };
        assert!(!DispatchReceipt::default().any_delivered());
        assert!(!DispatchReceipt {
            email: Some(failed.clone()),
            sms: None
        }
        .any_delivered());
        assert!(DispatchReceipt {
            email: Some(failed),
            sms: Some(ChannelOutcome::Simulated)
        }
        .any_delivered());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(ChannelOutcome::Failed {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"status": "failed", "error": "boom"}));
        assert_eq!(
            serde_json::to_value(ChannelOutcome::Simulated).unwrap(),
            serde_json::json!({"status": "simulated"})
        );
    }

    #[tokio::test]
    async fn unconfigured_channels_are_simulated() {
        let dispatcher = NotificationDispatcher::new(NotificationConfig::default(), "Blue Tape").unwrap();
        let receipt = dispatcher
            .send_issue_notification(&notice(Some("a@b.co"), Some("+15550100")))
            .await;
        assert_eq!(receipt.email, Some(ChannelOutcome::Simulated));
        assert_eq!(receipt.sms, Some(ChannelOutcome::Simulated));
        assert!(receipt.any_delivered());
    }

    #[tokio::test]
    async fn missing_address_skips_channel() {
        let dispatcher = NotificationDispatcher::new(NotificationConfig::default(), "Blue Tape").unwrap();
        let receipt = dispatcher.send_issue_notification(&notice(None, Some("+15550100"))).await;
        assert_eq!(receipt.email, None);
        assert_eq!(receipt.sms, Some(ChannelOutcome::Simulated));
    }
}
