//! Contractor directory model and DTOs.

use bluetape_core::lifecycle::Lifecycle;
use bluetape_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A contractor row from the `contractors` table.
///
/// `primary_trade_id` and `trade_names` are always written together by the
/// trade-selection shim.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contractor {
    pub id: DbId,
    pub company: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub primary_trade_id: Option<DbId>,
    pub trade_names: Vec<String>,
    pub notes: Option<String>,
    #[sqlx(rename = "is_active", try_from = "bool")]
    pub lifecycle: Lifecycle,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Contractor as returned by the API: the row plus catalog ids derived from
/// `trade_names`.
#[derive(Debug, Clone, Serialize)]
pub struct ContractorResponse {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub trade_ids: Vec<DbId>,
}

/// DTO for creating a contractor.
///
/// Trades may be given as catalog ids or as names; ids win when both are set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContractor {
    #[validate(length(min = 1, max = 255))]
    pub company: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub trade_ids: Option<Vec<DbId>>,
    pub trade_names: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// DTO for updating a contractor. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContractor {
    #[validate(length(min = 1, max = 255))]
    pub company: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub trade_ids: Option<Vec<DbId>>,
    pub trade_names: Option<Vec<String>>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for listing active contractors.
#[derive(Debug, Clone, Default)]
pub struct ContractorListFilter {
    /// Case-insensitive substring match on company or contact name.
    pub search: Option<String>,
    /// Matches the primary trade or a trade name in `trade_names`.
    pub trade_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
