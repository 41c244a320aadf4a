//! Bearer token verification.
//!
//! Blue Tape keeps no user accounts. An upstream identity service signs HS256
//! tokens whose claims carry the user id and a role name; this module checks
//! signature and expiry and turns the claims into a [`TokenIdentity`].
//! [`mint_token`] produces tokens of the same shape for operator scripts and
//! the HTTP tests.

use bluetape_core::error::CoreError;
use bluetape_core::roles::Role;
use bluetape_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime used when `JWT_ACCESS_EXPIRY_MINS` is unset.
const DEFAULT_TOKEN_TTL_MINS: i64 = 60;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// `admin`, `project_manager` or `viewer`.
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 60).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or blank, or the lifetime is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.trim().is_empty(), "JWT_SECRET must be set");

        let token_ttl_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .unwrap_or_else(|| panic!("JWT_ACCESS_EXPIRY_MINS must be a positive integer, got '{raw}'")),
            Err(_) => DEFAULT_TOKEN_TTL_MINS,
        };

        Self {
            secret,
            token_ttl_mins,
        }
    }

    fn validation() -> Validation {
        Validation::new(Algorithm::HS256)
    }
}

/// Who a verified token speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: DbId,
    pub role: Role,
}

/// Sign a token for `user_id` acting as `role`.
pub fn mint_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.name().to_string(),
        iat,
        exp: iat + config.token_ttl_mins * 60,
        jti: Uuid::new_v4(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, then resolve the role name.
///
/// Every failure is reported as [`CoreError::Unauthorized`]; the reason is
/// logged at debug level but not returned to the caller.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenIdentity, CoreError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        CoreError::Unauthorized("Invalid or expired token".into())
    })?;

    Ok(TokenIdentity {
        user_id: data.claims.sub,
        role: Role::from_name(&data.claims.role)?,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            token_ttl_mins: 15,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn minted_token_verifies_to_same_identity() {
        let config = config("punch-list-secret");
        let token = mint_token(42, Role::ProjectManager, &config).unwrap();

        let identity = verify_token(&token, &config).unwrap();
        assert_eq!(
            identity,
            TokenIdentity {
                user_id: 42,
                role: Role::ProjectManager
            }
        );
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "viewer".into(),
            iat: now - 900,
            exp: now - 600,
            jti: Uuid::new_v4(),
        };
        let token = sign(&claims, "punch-list-secret");

        assert_matches!(
            verify_token(&token, &config("punch-list-secret")),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn foreign_secret_is_unauthorized() {
        let token = mint_token(1, Role::Admin, &config("inspector-secret")).unwrap();
        assert_matches!(
            verify_token(&token, &config("punch-list-secret")),
            Err(CoreError::Unauthorized(_))
        );
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            role: "homeowner".into(),
            iat: now,
            exp: now + 600,
            jti: Uuid::new_v4(),
        };
        let token = sign(&claims, "punch-list-secret");

        assert_matches!(
            verify_token(&token, &config("punch-list-secret")),
            Err(CoreError::Unauthorized(msg)) if msg.contains("homeowner")
        );
    }
}
