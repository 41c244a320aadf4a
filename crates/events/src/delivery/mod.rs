//! Outbound delivery channels for contractor notifications.

pub mod email;
pub mod sms;
