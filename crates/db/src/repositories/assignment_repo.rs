//! Repository for the `project_contractors` table.

use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{Assignment, AssignmentDetail, CreateAssignment, UpdateAssignment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, contractor_id, trades, notes, created_at, updated_at";

/// Assignment columns joined with contractor display fields.
const DETAIL_SELECT: &str = "SELECT pc.id, pc.project_id, pc.contractor_id, pc.trades, pc.notes, \
        pc.created_at, pc.updated_at, c.company, c.contact_name, c.email, c.phone, \
        c.is_active AS contractor_is_active \
     FROM project_contractors pc \
     JOIN contractors c ON c.id = pc.contractor_id";

/// Provides operations on per-project contractor assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// List a project's assignments with contractor details, by company.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<AssignmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE pc.project_id = $1 ORDER BY c.company, pc.id");
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find an assignment with contractor details, scoped to its project.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        assignment_id: DbId,
    ) -> Result<Option<AssignmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE pc.id = $1 AND pc.project_id = $2");
        sqlx::query_as::<_, AssignmentDetail>(&query)
            .bind(assignment_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the contractor is already assigned to the project.
    pub async fn exists(
        pool: &PgPool,
        project_id: DbId,
        contractor_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM project_contractors WHERE project_id = $1 AND contractor_id = $2
             )",
        )
        .bind(project_id)
        .bind(contractor_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert an assignment. A duplicate surfaces as a unique violation on
    /// `uq_project_contractors_project_contractor`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateAssignment,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_contractors (project_id, contractor_id, trades, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(project_id)
            .bind(input.contractor_id)
            .bind(&input.trades)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Update an assignment's trade scope and notes.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        assignment_id: DbId,
        input: &UpdateAssignment,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE project_contractors SET
                trades = COALESCE($3, trades),
                notes = COALESCE($4, notes)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(assignment_id)
            .bind(project_id)
            .bind(&input.trades)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Remove an assignment. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        assignment_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_contractors WHERE id = $1 AND project_id = $2")
                .bind(assignment_id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
