//! Handlers for project areas (`/projects/{project_id}/areas`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::area::{default_order, normalize_name, DEFAULT_AREAS};
use bluetape_core::types::DbId;
use bluetape_db::models::area::{CreateArea, ReorderAreas, UpdateArea};
use bluetape_db::repositories::AreaRepo;
use validator::Validate;

use crate::error::{not_found, AppResult};
use crate::handlers::project::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/areas/defaults
pub async fn list_defaults(_auth: AuthUser) -> impl IntoResponse {
    Json(DataResponse {
        data: DEFAULT_AREAS,
    })
}

/// GET /api/v1/projects/{project_id}/areas
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let areas = AreaRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: areas }))
}

/// GET /api/v1/projects/{project_id}/areas/{area_id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, area_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let area = AreaRepo::find_in_project(&state.pool, project_id, area_id)
        .await?
        .ok_or_else(|| not_found("Area", area_id))?;
    Ok(Json(DataResponse { data: area }))
}

/// POST /api/v1/projects/{project_id}/areas
///
/// Custom areas go to the end of the list unless an order is given.
pub async fn create(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateArea>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = normalize_name(&input.name)?;
    ensure_project_exists(&state.pool, project_id).await?;

    let existing = AreaRepo::count_for_project(&state.pool, project_id).await?;
    let area = AreaRepo::create_custom(
        &state.pool,
        project_id,
        &name,
        default_order(input.order, existing),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: area })))
}

/// PUT /api/v1/projects/{project_id}/areas/{area_id}
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, area_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateArea>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let input = UpdateArea {
        name: input.name.as_deref().map(normalize_name).transpose()?,
        order: input.order,
    };
    let area = AreaRepo::update(&state.pool, project_id, area_id, &input)
        .await?
        .ok_or_else(|| not_found("Area", area_id))?;
    Ok(Json(DataResponse { data: area }))
}

/// DELETE /api/v1/projects/{project_id}/areas/{area_id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, area_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if AreaRepo::delete(&state.pool, project_id, area_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Area", area_id))
    }
}

/// PUT /api/v1/projects/{project_id}/areas/reorder
pub async fn reorder(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReorderAreas>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let areas = AreaRepo::reorder(&state.pool, project_id, &input.area_ids).await?;
    Ok(Json(DataResponse { data: areas }))
}
