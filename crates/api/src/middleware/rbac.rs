//! Write access for punch list data.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bluetape_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] allowed to create, edit, close and delete.
///
/// Viewers get 403; a missing or bad token is still 401 from [`AuthUser`].
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role.can_mutate() {
            Ok(RequireManager(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = user.role.name(), "Write refused");
            Err(CoreError::Forbidden(format!(
                "Role '{}' is read-only; project_manager or admin required",
                user.role.name()
            ))
            .into())
        }
    }
}
