//! Repository for the `projects` table.

use bluetape_core::area::DEFAULT_AREAS;
use bluetape_core::status::ProjectStatus;
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectListFilter, ProjectSeedSummary, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, unit, status, close_date, notes, owner_id, \
                       created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and, when requested, seed default areas and assign
    /// every active contractor. All writes share one transaction.
    pub async fn create_with_seed(
        pool: &PgPool,
        input: &CreateProject,
        owner_id: DbId,
    ) -> Result<(Project, ProjectSeedSummary), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, address, unit, status, close_date, notes, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(input.address.trim())
            .bind(&input.unit)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.close_date)
            .bind(&input.notes)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut summary = ProjectSeedSummary::default();

        if input.create_default_areas {
            let result = sqlx::query(
                "INSERT INTO areas (project_id, name, sort_order, is_custom)
                 SELECT $1, t.name, (t.ord - 1)::INTEGER, FALSE
                 FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS t(name, ord)",
            )
            .bind(project.id)
            .bind(DEFAULT_AREAS)
            .execute(&mut *tx)
            .await?;
            summary.areas_created = result.rows_affected();
        }

        if input.assign_all_contractors {
            let result = sqlx::query(
                "INSERT INTO project_contractors (project_id, contractor_id, trades)
                 SELECT $1, id, trade_names FROM contractors WHERE is_active
                 ORDER BY id",
            )
            .bind(project.id)
            .execute(&mut *tx)
            .await?;
            summary.contractors_assigned = result.rows_affected();
        }

        tx.commit().await?;
        Ok((project, summary))
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a project with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// List projects, most recently created first, with the total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectListFilter,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        const WHERE: &str = "($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR name ILIKE $2 OR address ILIKE $2)";

        let status = filter.status.map(ProjectStatus::as_str);
        let pattern = bluetape_core::search::contains_pattern(filter.search.as_deref());

        let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM projects WHERE {WHERE}"))
            .bind(status)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {WHERE}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(status)
            .bind(&pattern)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;

        Ok((items, total))
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                unit = COALESCE($4, unit),
                status = COALESCE($5, status),
                close_date = COALESCE($6, close_date),
                notes = COALESCE($7, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.address.as_deref().map(str::trim))
            .bind(&input.unit)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.close_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project. Areas, issues, photos, assignments and
    /// the manual go with it via FK cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
