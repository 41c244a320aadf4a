//! Contractor reachability rule for notification dispatch.

use crate::error::CoreError;
use crate::types::DbId;

/// The addresses a notification can go to. At least one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChannels {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Require an email or a phone number. Blank values count as missing.
pub fn ensure_contact(
    contractor_id: DbId,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<ContactChannels, CoreError> {
    let email = present(email);
    let phone = present(phone);
    if email.is_none() && phone.is_none() {
        return Err(CoreError::MissingContactInfo { contractor_id });
    }
    Ok(ContactChannels { email, phone })
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
