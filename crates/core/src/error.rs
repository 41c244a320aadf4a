use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Area {area_id} does not belong to project {project_id}")]
    InvalidArea { area_id: DbId, project_id: DbId },

    #[error("A trade named '{0}' already exists")]
    DuplicateName(String),

    #[error("Contractor {contractor_id} is already assigned to project {project_id}")]
    DuplicateAssignment { project_id: DbId, contractor_id: DbId },

    #[error("Issue {issue_id} cannot be closed without at least one 'after' photo")]
    MissingEvidence { issue_id: DbId },

    #[error("Issue {issue_id} already has the maximum of {limit} photos")]
    PhotoLimitExceeded { issue_id: DbId, limit: usize },

    #[error("Unsupported file type '{content_type}'. Allowed: {allowed}")]
    InvalidFileType {
        content_type: String,
        allowed: String,
    },

    #[error("File too large ({size_bytes} bytes). Maximum size: {max_mb}MB")]
    FileTooLarge { size_bytes: usize, max_mb: u64 },

    #[error("Contractor {contractor_id} has no email or phone configured")]
    MissingContactInfo { contractor_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
