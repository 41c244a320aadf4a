//! Handlers for project aggregation and reporting.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::report::{build_groups, export_filename, GroupBy, ReportFilter, StatusCounts};
use bluetape_core::status::IssueStatus;
use bluetape_core::types::DbId;
use bluetape_db::models::project::Project;
use bluetape_db::repositories::IssueRepo;
use bluetape_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::issue::attach_photos;
use crate::handlers::project::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::render::PunchListReport;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the grouped punch list.
#[derive(Debug, Deserialize)]
pub struct PunchListParams {
    #[serde(default)]
    pub group_by: GroupBy,
    pub status: Option<IssueStatus>,
    #[serde(default)]
    pub include_closed: bool,
}

/// Project summary with issue counts.
#[derive(Debug, Serialize)]
pub struct ProjectDashboard {
    pub project: Project,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

async fn build_report(
    pool: &DbPool,
    project_id: DbId,
    params: &PunchListParams,
) -> AppResult<PunchListReport> {
    let project = ensure_project_exists(pool, project_id).await?;
    let issues = IssueRepo::list_for_report(pool, project_id).await?;
    let details = attach_photos(pool, issues).await?;

    let filter = ReportFilter {
        status: params.status,
        include_closed: params.include_closed,
    };
    let (buckets, counts) = build_groups(details, params.group_by, filter);
    Ok(PunchListReport {
        project,
        group_by: params.group_by,
        buckets,
        counts,
    })
}

/// GET /api/v1/projects/{project_id}/dashboard
pub async fn dashboard(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    let counts = IssueRepo::counts_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse {
        data: ProjectDashboard {
            project,
            counts: counts.into(),
        },
    }))
}

/// GET /api/v1/projects/{project_id}/reports/punch-list
pub async fn punch_list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<PunchListParams>,
) -> AppResult<impl IntoResponse> {
    let report = build_report(&state.pool, project_id, &params).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/projects/{project_id}/reports/punch-list/export
///
/// Same grouping as the preview, served as a downloadable document.
pub async fn export_punch_list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<PunchListParams>,
) -> AppResult<impl IntoResponse> {
    let report = build_report(&state.pool, project_id, &params).await?;
    let document = state
        .renderer
        .render_punch_list(&report)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let filename = export_filename(&report.project.name, params.group_by, document.extension);
    tracing::info!(project_id, %filename, issues = report.counts.total_issues, "Punch list exported");

    Ok((
        [
            (CONTENT_TYPE, document.content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        document.bytes,
    ))
}
