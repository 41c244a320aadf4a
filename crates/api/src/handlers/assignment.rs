//! Handlers for project contractor assignments
//! (`/projects/{project_id}/assignments`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::error::CoreError;
use bluetape_core::types::DbId;
use bluetape_db::models::assignment::{AssignmentDetail, CreateAssignment, UpdateAssignment};
use bluetape_db::repositories::{AssignmentRepo, ContractorRepo};
use bluetape_db::DbPool;

use crate::error::{not_found, AppError, AppResult};
use crate::handlers::project::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

const UNIQUE_CONSTRAINT: &str = "uq_project_contractors_project_contractor";

pub(crate) async fn ensure_assignment_exists(
    pool: &DbPool,
    project_id: DbId,
    assignment_id: DbId,
) -> AppResult<AssignmentDetail> {
    AssignmentRepo::find_in_project(pool, project_id, assignment_id)
        .await?
        .ok_or_else(|| not_found("Assignment", assignment_id))
}

/// GET /api/v1/projects/{project_id}/assignments
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let assignments = AssignmentRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// GET /api/v1/projects/{project_id}/assignments/{assignment_id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, assignment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let assignment = ensure_assignment_exists(&state.pool, project_id, assignment_id).await?;
    Ok(Json(DataResponse { data: assignment }))
}

/// POST /api/v1/projects/{project_id}/assignments
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateAssignment>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    if !ContractorRepo::exists(&state.pool, input.contractor_id).await? {
        return Err(not_found("Contractor", input.contractor_id));
    }

    let duplicate = CoreError::DuplicateAssignment {
        project_id,
        contractor_id: input.contractor_id,
    };
    if AssignmentRepo::exists(&state.pool, project_id, input.contractor_id).await? {
        return Err(duplicate.into());
    }

    // A concurrent insert can still win the race; report it the same way.
    let assignment = match AssignmentRepo::create(&state.pool, project_id, &input).await {
        Ok(assignment) => assignment,
        Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(UNIQUE_CONSTRAINT) => {
            return Err(duplicate.into());
        }
        Err(e) => return Err(AppError::Database(e)),
    };

    let detail = ensure_assignment_exists(&state.pool, project_id, assignment.id).await?;
    tracing::info!(
        project_id,
        contractor_id = input.contractor_id,
        assignment_id = assignment.id,
        "Contractor assigned to project",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/projects/{project_id}/assignments/{assignment_id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, assignment_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateAssignment>,
) -> AppResult<impl IntoResponse> {
    AssignmentRepo::update(&state.pool, project_id, assignment_id, &input)
        .await?
        .ok_or_else(|| not_found("Assignment", assignment_id))?;
    let detail = ensure_assignment_exists(&state.pool, project_id, assignment_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/projects/{project_id}/assignments/{assignment_id}
///
/// Issues assigned to the contractor keep their `contractor_id`.
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, assignment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if AssignmentRepo::delete(&state.pool, project_id, assignment_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Assignment", assignment_id))
    }
}
