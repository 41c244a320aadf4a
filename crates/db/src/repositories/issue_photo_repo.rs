//! Repository for the `issue_photos` table.

use bluetape_core::error::CoreError;
use bluetape_core::issue::check_photo_capacity;
use bluetape_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue::{CreateIssuePhoto, IssuePhoto};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, issue_id, url, filename, photo_type, created_at, updated_at";

/// Result of a capped photo insert.
#[derive(Debug)]
pub enum PhotoInsert {
    Inserted(IssuePhoto),
    /// The issue no longer exists.
    IssueMissing,
    /// The cap was reached; nothing was written.
    Rejected(CoreError),
}

/// Provides operations on issue photos.
pub struct IssuePhotoRepo;

impl IssuePhotoRepo {
    /// Photos for one issue, oldest first.
    pub async fn list_for_issue(pool: &PgPool, issue_id: DbId) -> Result<Vec<IssuePhoto>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM issue_photos WHERE issue_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, IssuePhoto>(&query)
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }

    /// Photos for many issues at once, oldest first.
    pub async fn list_for_issues(
        pool: &PgPool,
        issue_ids: &[DbId],
    ) -> Result<Vec<IssuePhoto>, sqlx::Error> {
        if issue_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM issue_photos WHERE issue_id = ANY($1) ORDER BY created_at, id"
        );
        sqlx::query_as::<_, IssuePhoto>(&query)
            .bind(issue_ids)
            .fetch_all(pool)
            .await
    }

    /// Number of photos on an issue.
    pub async fn count_for_issue(pool: &PgPool, issue_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM issue_photos WHERE issue_id = $1")
                .bind(issue_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Insert a photo record unless the issue is already at the cap.
    ///
    /// The count is re-read while holding a row lock on the issue, so two
    /// concurrent uploads cannot both take the last slot.
    pub async fn insert_capped(
        pool: &PgPool,
        issue_id: DbId,
        input: &CreateIssuePhoto,
    ) -> Result<PhotoInsert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM issues WHERE id = $1 FOR UPDATE")
                .bind(issue_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(PhotoInsert::IssueMissing);
        }

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM issue_photos WHERE issue_id = $1")
                .bind(issue_id)
                .fetch_one(&mut *tx)
                .await?;
        if let Err(rejection) = check_photo_capacity(issue_id, existing) {
            return Ok(PhotoInsert::Rejected(rejection));
        }

        let query = format!(
            "INSERT INTO issue_photos (issue_id, url, filename, photo_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let photo = sqlx::query_as::<_, IssuePhoto>(&query)
            .bind(issue_id)
            .bind(&input.url)
            .bind(&input.filename)
            .bind(input.photo_type.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PhotoInsert::Inserted(photo))
    }

    /// Find a photo scoped to its issue.
    pub async fn find_for_issue(
        pool: &PgPool,
        issue_id: DbId,
        photo_id: DbId,
    ) -> Result<Option<IssuePhoto>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issue_photos WHERE id = $1 AND issue_id = $2");
        sqlx::query_as::<_, IssuePhoto>(&query)
            .bind(photo_id)
            .bind(issue_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a photo record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, issue_id: DbId, photo_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issue_photos WHERE id = $1 AND issue_id = $2")
            .bind(photo_id)
            .bind(issue_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stored URLs of every photo on an issue.
    pub async fn urls_for_issue(pool: &PgPool, issue_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT url FROM issue_photos WHERE issue_id = $1")
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }

    /// Stored URLs of every photo in a project.
    pub async fn urls_for_project(pool: &PgPool, project_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT p.url FROM issue_photos p
             JOIN issues i ON i.id = p.issue_id
             WHERE i.project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
