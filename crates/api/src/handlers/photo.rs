//! Handlers for issue photos
//! (`/projects/{project_id}/issues/{issue_id}/photos`).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bluetape_core::issue::check_photo_capacity;
use bluetape_core::status::PhotoType;
use bluetape_core::types::DbId;
use bluetape_db::models::issue::CreateIssuePhoto;
use bluetape_db::repositories::{IssuePhotoRepo, PhotoInsert};

use crate::error::{not_found, AppError, AppResult};
use crate::handlers::issue::ensure_issue_exists;
use crate::handlers::multipart::read_upload_form;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/issues/{issue_id}/photos
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let photos = IssuePhotoRepo::list_for_issue(&state.pool, issue_id).await?;
    Ok(Json(DataResponse { data: photos }))
}

/// POST /api/v1/projects/{project_id}/issues/{issue_id}/photos
///
/// Multipart form with a required `file` part and an optional `photo_type`
/// (`before` or `after`, default `before`). At most ten photos per issue.
pub async fn upload(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id)): Path<(DbId, DbId)>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let existing = IssuePhotoRepo::count_for_issue(&state.pool, issue_id).await?;
    check_photo_capacity(issue_id, existing)?;

    let mut form = read_upload_form(multipart, state.config.max_photo_size_mb).await?;
    let photo_type = form
        .text("photo_type")
        .map(PhotoType::parse)
        .transpose()?
        .unwrap_or_default();
    let file = form.take_file()?;

    let stored = state
        .storage
        .save_photo(&file.bytes, &file.content_type)
        .await?;

    let input = CreateIssuePhoto {
        url: stored.url.clone(),
        filename: Some(stored.filename),
        photo_type,
    };
    let outcome = IssuePhotoRepo::insert_capped(&state.pool, issue_id, &input).await;

    let err = match outcome {
        Ok(PhotoInsert::Inserted(photo)) => {
            tracing::info!(
                issue_id,
                photo_id = photo.id,
                photo_type = %photo.photo_type,
                user_id = user.user_id,
                "Issue photo uploaded",
            );
            return Ok((StatusCode::CREATED, Json(DataResponse { data: photo })));
        }
        Ok(PhotoInsert::IssueMissing) => not_found("Issue", issue_id),
        Ok(PhotoInsert::Rejected(core)) => AppError::Core(core),
        Err(e) => AppError::Database(e),
    };

    // The record was not written; do not leave the file behind.
    if let Err(e) = state.storage.delete_file(&stored.url).await {
        tracing::warn!(url = %stored.url, error = %e, "Failed to remove orphaned upload");
    }
    Err(err)
}

/// DELETE /api/v1/projects/{project_id}/issues/{issue_id}/photos/{photo_id}
pub async fn delete(
    RequireManager(_user): RequireManager,
    State(state): State<AppState>,
    Path((project_id, issue_id, photo_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_issue_exists(&state.pool, project_id, issue_id).await?;
    let photo = IssuePhotoRepo::find_for_issue(&state.pool, issue_id, photo_id)
        .await?
        .ok_or_else(|| not_found("IssuePhoto", photo_id))?;

    if let Err(e) = state.storage.delete_file(&photo.url).await {
        tracing::warn!(photo_id, url = %photo.url, error = %e, "Failed to remove stored photo");
    }

    if IssuePhotoRepo::delete(&state.pool, issue_id, photo_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("IssuePhoto", photo_id))
    }
}
