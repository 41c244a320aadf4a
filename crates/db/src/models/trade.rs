//! Trade catalog model and DTOs.

use bluetape_core::lifecycle::Lifecycle;
use bluetape_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::contractor::Contractor;

/// A trade row from the `trades` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trade {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    #[sqlx(rename = "is_active", try_from = "bool")]
    pub lifecycle: Lifecycle,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A trade with the number of active contractors whose primary trade it is.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradeWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub trade: Trade,
    pub contractor_count: i64,
}

/// A trade with its active contractors.
#[derive(Debug, Clone, Serialize)]
pub struct TradeWithContractors {
    #[serde(flatten)]
    pub trade: Trade,
    pub contractor_count: i64,
    pub contractors: Vec<Contractor>,
}

/// DTO for creating a trade.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrade {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
}

/// DTO for updating a trade. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrade {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub icon: Option<String>,
    pub order: Option<i32>,
    /// Reactivate (or deactivate) a trade.
    pub is_active: Option<bool>,
}
