//! Handlers for project issues (`/projects/{project_id}/issues`).
//!
//! Status changes go through [`change_status`], which applies the photo
//! evidence gate for closing.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::error::CoreError;
use bluetape_core::issue::DEFAULT_CATEGORIES;
use bluetape_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bluetape_core::status::{IssuePriority, IssueStatus};
use bluetape_core::types::DbId;
use bluetape_db::models::issue::{
    CreateIssue, IssueDetail, IssueListFilter, IssueWithLabels, StatusChange, UpdateIssue,
};
use bluetape_db::repositories::{
    AreaRepo, ContractorRepo, IssuePhotoRepo, IssueRepo, TransitionOutcome,
};
use bluetape_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::handlers::project::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Query parameters for `GET /projects/{project_id}/issues`.
#[derive(Debug, Deserialize)]
pub struct IssueListParams {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub area_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
    pub trade: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Load an issue within its project or fail with 404.
pub(crate) async fn ensure_issue_exists(
    pool: &DbPool,
    project_id: DbId,
    issue_id: DbId,
) -> AppResult<IssueWithLabels> {
    IssueRepo::find_labeled(pool, project_id, issue_id)
        .await?
        .ok_or_else(|| not_found("Issue", issue_id))
}

/// Attach photos to labeled issues with one query.
pub(crate) async fn attach_photos(
    pool: &DbPool,
    issues: Vec<IssueWithLabels>,
) -> AppResult<Vec<IssueDetail>> {
    let ids: Vec<DbId> = issues.iter().map(|i| i.issue.id).collect();
    let mut by_issue: HashMap<DbId, Vec<_>> = HashMap::new();
    for photo in IssuePhotoRepo::list_for_issues(pool, &ids).await? {
        by_issue.entry(photo.issue_id).or_default().push(photo);
    }

    Ok(issues
        .into_iter()
        .map(|issue| {
            let photos = by_issue.remove(&issue.issue.id).unwrap_or_default();
            IssueDetail { issue, photos }
        })
        .collect())
}

/// Check that referenced area and contractor are usable for this project.
async fn check_references(
    pool: &DbPool,
    project_id: DbId,
    area_id: Option<DbId>,
    contractor_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(area_id) = area_id {
        if !AreaRepo::belongs_to_project(pool, project_id, area_id).await? {
            return Err(CoreError::InvalidArea {
                area_id,
                project_id,
            }
            .into());
        }
    }
    if let Some(contractor_id) = contractor_id {
        if !ContractorRepo::exists(pool, contractor_id).await? {
            return Err(not_found("Contractor", contractor_id));
        }
    }
    Ok(())
}

/// GET /api/v1/issues/categories
pub async fn list_categories(_auth: AuthUser) -> impl IntoResponse {
    Json(DataResponse {
        data: DEFAULT_CATEGORIES,
    })
}

/// GET /api/v1/projects/{project_id}/issues
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<IssueListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let filter = IssueListFilter {
        status: params.status,
        priority: params.priority,
        area_id: params.area_id,
        contractor_id: params.contractor_id,
        trade: params.trade,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let (issues, total) = IssueRepo::list(&state.pool, project_id, &filter).await?;
    let items = attach_photos(&state.pool, issues).await?;
    Ok(Json(DataResponse {
        data: Page { items, total },
    }))
}

/// GET /api/v1/projects/{project_id}/issues/{issue_id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let issue = ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let photos = IssuePhotoRepo::list_for_issue(&state.pool, issue_id).await?;
    Ok(Json(DataResponse {
        data: IssueDetail { issue, photos },
    }))
}

/// POST /api/v1/projects/{project_id}/issues
///
/// Starts `assigned` when a contractor is given, `open` otherwise.
pub async fn create(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateIssue>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_project_exists(&state.pool, project_id).await?;
    check_references(&state.pool, project_id, input.area_id, input.contractor_id).await?;

    let created = IssueRepo::create(&state.pool, project_id, &input, user.user_id).await?;
    tracing::info!(
        project_id,
        issue_id = created.id,
        status = %created.status,
        user_id = user.user_id,
        "Issue created",
    );

    let issue = ensure_issue_exists(&state.pool, project_id, created.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: IssueDetail {
                issue,
                photos: Vec::new(),
            },
        }),
    ))
}

/// PUT /api/v1/projects/{project_id}/issues/{issue_id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateIssue>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    check_references(
        &state.pool,
        project_id,
        input.area_id.flatten(),
        input.contractor_id.flatten(),
    )
    .await?;

    IssueRepo::update(&state.pool, project_id, issue_id, &input)
        .await?
        .ok_or_else(|| not_found("Issue", issue_id))?;

    let issue = ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let photos = IssuePhotoRepo::list_for_issue(&state.pool, issue_id).await?;
    Ok(Json(DataResponse {
        data: IssueDetail { issue, photos },
    }))
}

/// POST /api/v1/projects/{project_id}/issues/{issue_id}/status
///
/// Closing requires at least one `after` photo. Any status may move to any
/// other; reopening keeps the last-closed record.
pub async fn change_status(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
    Json(change): Json<StatusChange>,
) -> AppResult<impl IntoResponse> {
    let issue =
        match IssueRepo::transition(&state.pool, project_id, issue_id, &change, user.user_id)
            .await?
        {
            TransitionOutcome::Applied(issue) => issue,
            TransitionOutcome::NotFound => return Err(not_found("Issue", issue_id)),
            TransitionOutcome::Rejected(err) => {
                tracing::info!(issue_id, error = %err, "Status change rejected");
                return Err(err.into());
            }
        };

    tracing::info!(
        project_id,
        issue_id,
        status = %issue.status,
        user_id = user.user_id,
        "Issue status changed",
    );
    Ok(Json(DataResponse { data: issue }))
}

/// DELETE /api/v1/projects/{project_id}/issues/{issue_id}
///
/// Removes the issue, its photo records, and (best effort) the stored files.
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let urls = IssuePhotoRepo::urls_for_issue(&state.pool, issue_id).await?;

    // Files go first, best effort; the row (and its photo rows) follow.
    for url in &urls {
        if let Err(e) = state.storage.delete_file(url).await {
            tracing::warn!(issue_id, url, error = %e, "Failed to remove stored photo");
        }
    }

    if !IssueRepo::delete(&state.pool, project_id, issue_id).await? {
        return Err(not_found("Issue", issue_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
