//! Server configuration, read once at startup.
//!
//! | Env var                 | Default                 |
//! |-------------------------|-------------------------|
//! | `HOST`                  | `0.0.0.0`               |
//! | `PORT`                  | `3000`                  |
//! | `CORS_ORIGINS`          | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`  | `30`                    |
//! | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
//! | `UPLOAD_DIR`            | `./uploads`             |
//! | `MAX_PHOTO_SIZE_MB`     | `10`                    |
//! | `APP_NAME`              | `Blue Tape`             |
//!
//! JWT settings come from [`JwtConfig::from_env`]. Bad values panic so a
//! misconfigured deployment never starts.

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use bluetape_core::upload::DEFAULT_MAX_UPLOAD_MB;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long to wait for pooled connections to close after shutdown.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Photos and manual documents live under this directory.
    pub upload_dir: PathBuf,
    /// Per-file limit for photos and documents.
    pub max_photo_size_mb: u64,
    /// Sender name in contractor emails and texts.
    pub app_name: String,
}

/// Read `key`, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key}='{raw}' is invalid: {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let max_photo_size_mb = env_or("MAX_PHOTO_SIZE_MB", DEFAULT_MAX_UPLOAD_MB);
        assert!(max_photo_size_mb > 0, "MAX_PHOTO_SIZE_MB must be positive");

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(&env_or(
                "CORS_ORIGINS",
                "http://localhost:5173".to_string(),
            )),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            upload_dir: env_or("UPLOAD_DIR", PathBuf::from("./uploads")),
            max_photo_size_mb,
            app_name: env_or("APP_NAME", "Blue Tape".to_string()),
        }
    }

    /// The socket address to listen on.
    ///
    /// # Panics
    ///
    /// Panics when `HOST` is not an IP address.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip: IpAddr = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST='{}' is not an IP address: {e}", self.host));
        SocketAddr::new(ip, self.port)
    }
}
