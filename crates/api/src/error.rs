use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bluetape_core::error::CoreError;
use serde_json::json;

use crate::storage::StorageError;

/// Everything a handler can fail with. Rendered as `{"error", "code"}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request payload failed `validator` rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Malformed multipart uploads.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Build the 404 error for a missing entity.
pub fn not_found(entity: &'static str, id: bluetape_core::types::DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),

            AppError::Storage(StorageError::Rejected(core)) => classify_core_error(core),
            AppError::Storage(StorageError::Io(err)) => {
                tracing::error!(error = %err, "File storage error");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a domain error to its HTTP status and stable error code.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    let message = core.to_string();
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::InvalidArea { .. } => (StatusCode::BAD_REQUEST, "INVALID_AREA", message),
        CoreError::DuplicateName(_) => (StatusCode::CONFLICT, "DUPLICATE_NAME", message),
        CoreError::DuplicateAssignment { .. } => {
            (StatusCode::CONFLICT, "DUPLICATE_ASSIGNMENT", message)
        }
        CoreError::MissingEvidence { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_EVIDENCE", message)
        }
        CoreError::PhotoLimitExceeded { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "PHOTO_LIMIT_EXCEEDED",
            message,
        ),
        CoreError::InvalidFileType { .. } => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "INVALID_FILE_TYPE",
            message,
        ),
        CoreError::FileTooLarge { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", message)
        }
        CoreError::MissingContactInfo { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "MISSING_CONTACT_INFO",
            message,
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

const PG_UNIQUE_VIOLATION: &str = "23505";

/// Missing rows are 404 and our own `uq_*` constraints are 409. Anything else
/// is logged and hidden behind a generic 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string());
    }

    let unique_constraint = err
        .as_database_error()
        .filter(|db| db.code().as_deref() == Some(PG_UNIQUE_VIOLATION))
        .and_then(|db| db.constraint())
        .filter(|name| name.starts_with("uq_"));
    if let Some(constraint) = unique_constraint {
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        );
    }

    tracing::error!(error = %err, "Database error");
    internal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_distinct_statuses() {
        let cases = [
            (CoreError::NotFound { entity: "Issue", id: 1 }, StatusCode::NOT_FOUND),
            (CoreError::InvalidArea { area_id: 1, project_id: 2 }, StatusCode::BAD_REQUEST),
            (CoreError::DuplicateName("HVAC".into()), StatusCode::CONFLICT),
            (CoreError::MissingEvidence { issue_id: 1 }, StatusCode::UNPROCESSABLE_ENTITY),
            (
                CoreError::InvalidFileType { content_type: "a/b".into(), allowed: String::new() },
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (CoreError::FileTooLarge { size_bytes: 1, max_mb: 1 }, StatusCode::PAYLOAD_TOO_LARGE),
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (CoreError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::Core(err).into_response().status(), expected);
        }
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            classify_core_error(&CoreError::MissingContactInfo { contractor_id: 3 }).1,
            "MISSING_CONTACT_INFO"
        );
        assert_eq!(
            classify_core_error(&CoreError::PhotoLimitExceeded { issue_id: 3, limit: 10 }).1,
            "PHOTO_LIMIT_EXCEEDED"
        );
        assert_eq!(
            classify_core_error(&CoreError::DuplicateAssignment { project_id: 1, contractor_id: 2 }).1,
            "DUPLICATE_ASSIGNMENT"
        );
    }

    #[test]
    fn row_not_found_is_404() {
        assert_eq!(classify_sqlx_error(&sqlx::Error::RowNotFound).0, StatusCode::NOT_FOUND);
    }
}
