//! Repository for the `areas` table.

use bluetape_core::area::reorder_plan;
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::area::{Area, UpdateArea};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, sort_order, is_custom, created_at, updated_at";

/// Provides CRUD and ordering operations for project areas.
pub struct AreaRepo;

impl AreaRepo {
    /// List a project's areas by sort order, then id.
    pub async fn list_for_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Area>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM areas WHERE project_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Area>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find an area scoped to its project.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        area_id: DbId,
    ) -> Result<Option<Area>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM areas WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Area>(&query)
            .bind(area_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `area_id` belongs to `project_id`.
    pub async fn belongs_to_project(
        pool: &PgPool,
        project_id: DbId,
        area_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM areas WHERE id = $1 AND project_id = $2)",
        )
        .bind(area_id)
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Number of areas in a project.
    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM areas WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert a custom area at the given sort order.
    pub async fn create_custom(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
        order: i32,
    ) -> Result<Area, sqlx::Error> {
        let query = format!(
            "INSERT INTO areas (project_id, name, sort_order, is_custom)
             VALUES ($1, $2, $3, TRUE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Area>(&query)
            .bind(project_id)
            .bind(name)
            .bind(order)
            .fetch_one(pool)
            .await
    }

    /// Update an area within its project. Returns `None` if not found there.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        area_id: DbId,
        input: &UpdateArea,
    ) -> Result<Option<Area>, sqlx::Error> {
        let query = format!(
            "UPDATE areas SET
                name = COALESCE($3, name),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Area>(&query)
            .bind(area_id)
            .bind(project_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.order)
            .fetch_optional(pool)
            .await
    }

    /// Delete an area within its project. Issues in it keep existing with
    /// `area_id` set to NULL. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, area_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM areas WHERE id = $1 AND project_id = $2")
            .bind(area_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a new ordering in one transaction and return the resulting list.
    ///
    /// Ids that are not areas of this project are skipped.
    pub async fn reorder(
        pool: &PgPool,
        project_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<Area>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owned: Vec<DbId> =
            sqlx::query_scalar("SELECT id FROM areas WHERE project_id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_all(&mut *tx)
                .await?;

        for (area_id, order) in reorder_plan(ordered_ids, &owned) {
            sqlx::query("UPDATE areas SET sort_order = $2 WHERE id = $1")
                .bind(area_id)
                .bind(order)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM areas WHERE project_id = $1 ORDER BY sort_order, id"
        );
        let areas = sqlx::query_as::<_, Area>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(areas)
    }
}
