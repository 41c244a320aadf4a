//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bluetape_core::status::ProjectStatus;
use bluetape_core::types::DbId;
use bluetape_db::models::project::{
    CreateProject, Project, ProjectListFilter, ProjectSeedSummary, UpdateProject,
};
use bluetape_db::repositories::{IssuePhotoRepo, ManualRepo, ProjectRepo};
use bluetape_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListParams {
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A freshly created project plus what was seeded with it.
#[derive(Debug, Serialize)]
pub struct CreatedProject {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub seeded: ProjectSeedSummary,
}

/// Load a project or fail with 404.
pub(crate) async fn ensure_project_exists(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Project", id))
}

/// POST /api/v1/projects
pub async fn create(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let (project, seeded) = ProjectRepo::create_with_seed(&state.pool, &input, user.user_id).await?;

    tracing::info!(
        project_id = project.id,
        user_id = user.user_id,
        areas_created = seeded.areas_created,
        contractors_assigned = seeded.contractors_assigned,
        "Project created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedProject { project, seeded },
        }),
    ))
}

/// GET /api/v1/projects
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ProjectListFilter {
        status: params.status,
        search: params.search,
        limit: clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: clamp_offset(params.offset),
    };
    let (items, total) = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: Page { items, total },
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Rows go via FK cascade. Stored photo and manual files are removed best
/// effort after the rows are gone.
pub async fn delete(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut urls = IssuePhotoRepo::urls_for_project(&state.pool, id).await?;
    if let Some(manual) = ManualRepo::find_by_project(&state.pool, id).await? {
        urls.extend(manual.attachments.0.into_iter().map(|a| a.url));
    }

    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(not_found("Project", id));
    }

    for url in &urls {
        if let Err(e) = state.storage.delete_file(url).await {
            tracing::warn!(project_id = id, url, error = %e, "Failed to remove stored file");
        }
    }

    tracing::info!(project_id = id, user_id = user.user_id, files = urls.len(), "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
