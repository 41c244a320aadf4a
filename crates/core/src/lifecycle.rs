//! Soft-delete lifecycle shared by trades and contractors.

use serde::{Deserialize, Serialize};

/// Rows are never hard-deleted; "delete" moves them to `Deactivated`.
///
/// Stored as the `is_active` boolean column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    Deactivated,
}

impl Lifecycle {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for Lifecycle {
    fn from(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Deactivated
        }
    }
}

impl From<Lifecycle> for bool {
    fn from(value: Lifecycle) -> Self {
        value.is_active()
    }
}
