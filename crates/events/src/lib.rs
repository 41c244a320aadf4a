//! Blue Tape outbound notifications.
//!
//! - [`delivery`]: the email (SMTP) and SMS (Twilio) channels.
//! - [`NotificationDispatcher`]: formats issue notices and reminders and
//!   fans them out to every channel the contractor has an address for.

pub mod delivery;
pub mod dispatch;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::sms::{SmsConfig, SmsDelivery, SmsError};
pub use dispatch::{
    ChannelOutcome, DispatchReceipt, IssueNotice, NotificationConfig, NotificationDispatcher,
    ReminderNotice,
};
