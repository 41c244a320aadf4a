//! Home owner manual instance model and DTOs.

use bluetape_core::manual::ManualAttachment;
use bluetape_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `manual_instances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ManualInstance {
    pub id: DbId,
    pub project_id: DbId,
    /// Field values keyed by section id.
    pub fields: serde_json::Value,
    pub attachments: Json<Vec<ManualAttachment>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for replacing a manual's fields and/or attachments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateManual {
    pub fields: Option<serde_json::Map<String, serde_json::Value>>,
    pub attachments: Option<Vec<ManualAttachment>>,
}
