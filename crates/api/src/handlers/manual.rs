//! Handlers for the per-project Home Owner Manual
//! (`/projects/{project_id}/manual`).

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::manual::{default_sections, export_filename, validate_section, ManualAttachment};
use bluetape_core::types::DbId;
use bluetape_core::upload::normalize_content_type;
use bluetape_db::models::manual::UpdateManual;
use bluetape_db::repositories::ManualRepo;

use crate::error::{not_found, AppError, AppResult};
use crate::handlers::multipart::read_upload_form;
use crate::handlers::project::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/manual/sections
pub async fn list_sections(_auth: AuthUser) -> impl IntoResponse {
    Json(DataResponse {
        data: default_sections(),
    })
}

/// GET /api/v1/projects/{project_id}/manual
///
/// Creates an empty manual on first access.
pub async fn get(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    let manual = ManualRepo::get_or_create(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: manual }))
}

/// PUT /api/v1/projects/{project_id}/manual
pub async fn update(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<UpdateManual>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;
    if let Some(attachments) = input.attachments.as_mut() {
        for attachment in attachments.iter_mut() {
            attachment.section = validate_section(&attachment.section)?;
        }
    }

    let manual = ManualRepo::upsert(&state.pool, project_id, &input).await?;
    Ok(Json(DataResponse { data: manual }))
}

/// POST /api/v1/projects/{project_id}/manual/attachments
///
/// Multipart form with a required `file` and `section`, and an optional
/// display `name` (defaults to the uploaded file name).
pub async fn upload_attachment(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    let mut form = read_upload_form(multipart, state.config.max_photo_size_mb).await?;
    let section = validate_section(form.text("section").unwrap_or_default())?;
    let display_name = form.text("name").map(str::to_string);
    let file = form.take_file()?;

    let stored = state
        .storage
        .save_document(&file.bytes, &file.content_type)
        .await?;

    let attachment = ManualAttachment {
        section,
        name: display_name
            .or(file.filename)
            .unwrap_or_else(|| stored.filename.clone()),
        url: stored.url.clone(),
        content_type: normalize_content_type(&file.content_type),
    };

    match ManualRepo::append_attachment(&state.pool, project_id, &attachment).await {
        Ok(manual) => {
            tracing::info!(
                project_id,
                section = %attachment.section,
                url = %attachment.url,
                user_id = user.user_id,
                "Manual attachment uploaded",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: manual })))
        }
        Err(e) => {
            if let Err(cleanup) = state.storage.delete_file(&stored.url).await {
                tracing::warn!(url = %stored.url, error = %cleanup, "Failed to remove orphaned upload");
            }
            Err(AppError::Database(e))
        }
    }
}

/// GET /api/v1/projects/{project_id}/manual/export
pub async fn export(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    let manual = ManualRepo::find_by_project(&state.pool, project_id)
        .await?
        .ok_or_else(|| not_found("ManualInstance", project_id))?;

    let document = state
        .renderer
        .render_manual(&project, &manual)
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let filename = export_filename(&project.name, document.extension);

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
