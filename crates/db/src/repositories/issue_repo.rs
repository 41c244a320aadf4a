//! Repository for the `issues` table, including the evidence-gated status
//! transition.

use bluetape_core::error::CoreError;
use bluetape_core::issue::{initial_status, plan_transition, ClosureStamp};
use bluetape_core::status::{IssuePriority, IssueStatus};
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue::{
    CreateIssue, Issue, IssueCountsRow, IssueListFilter, IssueWithLabels, StatusChange,
    UpdateIssue,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, area_id, category, subcategory, description, priority, \
                       status, resolution_notes, trade_label, contractor_id, due_date, \
                       created_by, closed_by, closed_at, last_closed_by, last_closed_at, \
                       notification_sent_at, created_at, updated_at";

/// Issue columns plus area and contractor labels.
const LABELED_SELECT: &str = "SELECT i.id, i.project_id, i.area_id, i.category, i.subcategory, \
        i.description, i.priority, i.status, i.resolution_notes, i.trade_label, \
        i.contractor_id, i.due_date, i.created_by, i.closed_by, i.closed_at, \
        i.last_closed_by, i.last_closed_at, i.notification_sent_at, i.created_at, \
        i.updated_at, a.name AS area_name, c.company AS contractor_name \
     FROM issues i \
     LEFT JOIN areas a ON a.id = i.area_id \
     LEFT JOIN contractors c ON c.id = i.contractor_id";

/// Shared filter clause for issue listings (`$1` is the project).
const LIST_WHERE: &str = "i.project_id = $1
       AND ($2::TEXT IS NULL OR i.status = $2)
       AND ($3::TEXT IS NULL OR i.priority = $3)
       AND ($4::BIGINT IS NULL OR i.area_id = $4)
       AND ($5::BIGINT IS NULL OR i.contractor_id = $5)
       AND ($6::TEXT IS NULL OR i.trade_label = $6)";

/// Result of a status change attempt.
#[derive(Debug)]
pub enum TransitionOutcome {
    Applied(Issue),
    /// The issue does not exist in the project.
    NotFound,
    /// The evidence gate refused the change; nothing was written.
    Rejected(CoreError),
}

/// Provides CRUD, listing and lifecycle operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert an issue. Status is derived from whether a contractor is set.
    ///
    /// The caller validates that `area_id` belongs to the project and that
    /// the contractor exists.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateIssue,
        created_by: DbId,
    ) -> Result<Issue, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues
                (project_id, area_id, category, subcategory, description, priority, status,
                 trade_label, contractor_id, due_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(project_id)
            .bind(input.area_id)
            .bind(input.category.trim())
            .bind(&input.subcategory)
            .bind(&input.description)
            .bind(input.priority.as_str())
            .bind(initial_status(input.contractor_id).as_str())
            .bind(&input.trade_label)
            .bind(input.contractor_id)
            .bind(input.due_date)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an issue row scoped to its project.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        issue_id: DbId,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Issue>(&query)
            .bind(issue_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an issue with area and contractor labels, scoped to its project.
    pub async fn find_labeled(
        pool: &PgPool,
        project_id: DbId,
        issue_id: DbId,
    ) -> Result<Option<IssueWithLabels>, sqlx::Error> {
        let query = format!("{LABELED_SELECT} WHERE i.id = $1 AND i.project_id = $2");
        sqlx::query_as::<_, IssueWithLabels>(&query)
            .bind(issue_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's issues, newest first, with the total match count.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        filter: &IssueListFilter,
    ) -> Result<(Vec<IssueWithLabels>, i64), sqlx::Error> {
        let status = filter.status.map(IssueStatus::as_str);
        let priority = filter.priority.map(IssuePriority::as_str);

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM issues i WHERE {LIST_WHERE}"))
                .bind(project_id)
                .bind(status)
                .bind(priority)
                .bind(filter.area_id)
                .bind(filter.contractor_id)
                .bind(&filter.trade)
                .fetch_one(pool)
                .await?;

        let query = format!(
            "{LABELED_SELECT} WHERE {LIST_WHERE}
             ORDER BY i.created_at DESC, i.id DESC
             LIMIT $7 OFFSET $8"
        );
        let items = sqlx::query_as::<_, IssueWithLabels>(&query)
            .bind(project_id)
            .bind(status)
            .bind(priority)
            .bind(filter.area_id)
            .bind(filter.contractor_id)
            .bind(&filter.trade)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;

        Ok((items, total))
    }

    /// Every issue of a project in report order `(created_at, id)`.
    pub async fn list_for_report(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<IssueWithLabels>, sqlx::Error> {
        let query =
            format!("{LABELED_SELECT} WHERE i.project_id = $1 ORDER BY i.created_at, i.id");
        sqlx::query_as::<_, IssueWithLabels>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update an issue's descriptive fields. Status is not touched here.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        issue_id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                area_id = CASE WHEN $3 THEN $4 ELSE area_id END,
                category = COALESCE($5, category),
                subcategory = CASE WHEN $6 THEN $7 ELSE subcategory END,
                description = CASE WHEN $8 THEN $9 ELSE description END,
                priority = COALESCE($10, priority),
                trade_label = CASE WHEN $11 THEN $12 ELSE trade_label END,
                contractor_id = CASE WHEN $13 THEN $14 ELSE contractor_id END,
                due_date = CASE WHEN $15 THEN $16 ELSE due_date END
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        // Clearable fields bind (provided, value); `None` keeps the column.
        sqlx::query_as::<_, Issue>(&query)
            .bind(issue_id)
            .bind(project_id)
            .bind(input.area_id.is_some())
            .bind(input.area_id.flatten())
            .bind(input.category.as_deref().map(str::trim))
            .bind(input.subcategory.is_some())
            .bind(input.subcategory.as_ref().and_then(|v| v.as_deref()))
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.priority.map(IssuePriority::as_str))
            .bind(input.trade_label.is_some())
            .bind(input.trade_label.as_ref().and_then(|v| v.as_deref()))
            .bind(input.contractor_id.is_some())
            .bind(input.contractor_id.flatten())
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Change an issue's status under a row lock.
    ///
    /// The `after` photo count is read while the issue row is locked, so a
    /// concurrent photo delete cannot slip between the gate and the write.
    pub async fn transition(
        pool: &PgPool,
        project_id: DbId,
        issue_id: DbId,
        change: &StatusChange,
        actor: DbId,
    ) -> Result<TransitionOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<String> = sqlx::query_scalar(
            "SELECT status FROM issues WHERE id = $1 AND project_id = $2 FOR UPDATE",
        )
        .bind(issue_id)
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(TransitionOutcome::NotFound);
        };
        let from = IssueStatus::parse(&current).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let (after_photos,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM issue_photos WHERE issue_id = $1 AND photo_type = 'after'",
        )
        .bind(issue_id)
        .fetch_one(&mut *tx)
        .await?;

        let plan = match plan_transition(issue_id, from, change.status, after_photos) {
            Ok(plan) => plan,
            Err(rejection) => return Ok(TransitionOutcome::Rejected(rejection)),
        };

        let query = format!(
            "UPDATE issues SET
                status = $2,
                resolution_notes = COALESCE($3, resolution_notes),
                closed_by = CASE WHEN $4::BOOLEAN THEN $5::BIGINT
                                 WHEN $6::BOOLEAN THEN NULL ELSE closed_by END,
                closed_at = CASE WHEN $4::BOOLEAN THEN NOW()
                                 WHEN $6::BOOLEAN THEN NULL ELSE closed_at END,
                last_closed_by = CASE WHEN $4::BOOLEAN THEN $5::BIGINT ELSE last_closed_by END,
                last_closed_at = CASE WHEN $4::BOOLEAN THEN NOW() ELSE last_closed_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let issue = sqlx::query_as::<_, Issue>(&query)
            .bind(issue_id)
            .bind(plan.to.as_str())
            .bind(&change.notes)
            .bind(plan.closure == ClosureStamp::Stamp)
            .bind(actor)
            .bind(plan.closure == ClosureStamp::Clear)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            issue_id,
            from = %plan.from,
            to = %plan.to,
            "Issue status changed"
        );
        Ok(TransitionOutcome::Applied(issue))
    }

    /// Stamp `notification_sent_at` with the current time.
    pub async fn mark_notified(pool: &PgPool, issue_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE issues SET notification_sent_at = NOW() WHERE id = $1")
            .bind(issue_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of non-closed issues assigned to a contractor in a project.
    pub async fn count_pending_for_contractor(
        pool: &PgPool,
        project_id: DbId,
        contractor_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM issues
             WHERE project_id = $1 AND contractor_id = $2 AND status <> 'closed'",
        )
        .bind(project_id)
        .bind(contractor_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Dashboard counts for a project, computed in one aggregate.
    pub async fn counts_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<IssueCountsRow, sqlx::Error> {
        sqlx::query_as::<_, IssueCountsRow>(
            "SELECT
                COUNT(*) AS total_issues,
                COUNT(*) FILTER (WHERE status = 'open') AS open_issues,
                COUNT(*) FILTER (WHERE status = 'assigned') AS assigned_issues,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_issues,
                COUNT(*) FILTER (WHERE status = 'ready_for_reinspect') AS ready_for_reinspect,
                COUNT(*) FILTER (WHERE status = 'closed') AS closed_issues,
                COUNT(*) FILTER (WHERE priority = 'high' AND status <> 'closed')
                    AS high_priority_open
             FROM issues
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// Delete an issue row (photo rows cascade). Returns `true` if removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, issue_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1 AND project_id = $2")
            .bind(issue_id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
