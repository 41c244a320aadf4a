//! Well-known role name constants and the role ladder.
//!
//! Role names are issued by the auth collaborator inside access tokens.
//! Mutating operations require at least [`Role::ProjectManager`].

use serde::Serialize;

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PROJECT_MANAGER: &str = "project_manager";
pub const ROLE_VIEWER: &str = "viewer";

/// A user role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    ProjectManager,
    Admin,
}

impl Role {
    /// Parse a role name as carried in token claims.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_PROJECT_MANAGER => Ok(Self::ProjectManager),
            ROLE_VIEWER => Ok(Self::Viewer),
            other => Err(CoreError::Unauthorized(format!("Unknown role '{other}'"))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::ProjectManager => ROLE_PROJECT_MANAGER,
            Self::Viewer => ROLE_VIEWER,
        }
    }

    /// Whether this role may create, update, or delete punch list data.
    pub fn can_mutate(self) -> bool {
        self >= Self::ProjectManager
    }
}
