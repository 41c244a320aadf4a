//! Repository for the `manual_instances` table.

use bluetape_core::manual::ManualAttachment;
use bluetape_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::manual::{ManualInstance, UpdateManual};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, fields, attachments, created_at, updated_at";

/// Provides get-or-create and upsert operations for project manuals.
pub struct ManualRepo;

impl ManualRepo {
    /// Find the manual for a project, if one exists.
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ManualInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manual_instances WHERE project_id = $1");
        sqlx::query_as::<_, ManualInstance>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the project's manual, creating an empty one if needed.
    pub async fn get_or_create(pool: &PgPool, project_id: DbId) -> Result<ManualInstance, sqlx::Error> {
        sqlx::query(
            "INSERT INTO manual_instances (project_id) VALUES ($1)
             ON CONFLICT (project_id) DO NOTHING",
        )
        .bind(project_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM manual_instances WHERE project_id = $1");
        sqlx::query_as::<_, ManualInstance>(&query)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Create or update the manual. `None` fields keep their stored value.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &UpdateManual,
    ) -> Result<ManualInstance, sqlx::Error> {
        let query = format!(
            "INSERT INTO manual_instances (project_id, fields, attachments)
             VALUES ($1, COALESCE($2, '{{}}'::jsonb), COALESCE($3, '[]'::jsonb))
             ON CONFLICT (project_id) DO UPDATE SET
                fields = COALESCE($2, manual_instances.fields),
                attachments = COALESCE($3, manual_instances.attachments)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManualInstance>(&query)
            .bind(project_id)
            .bind(input.fields.as_ref().map(Json))
            .bind(input.attachments.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Append one attachment, creating the manual if needed.
    pub async fn append_attachment(
        pool: &PgPool,
        project_id: DbId,
        attachment: &ManualAttachment,
    ) -> Result<ManualInstance, sqlx::Error> {
        let query = format!(
            "INSERT INTO manual_instances (project_id, attachments)
             VALUES ($1, $2)
             ON CONFLICT (project_id) DO UPDATE SET
                attachments = manual_instances.attachments || EXCLUDED.attachments
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ManualInstance>(&query)
            .bind(project_id)
            .bind(Json(vec![attachment]))
            .fetch_one(pool)
            .await
    }
}
