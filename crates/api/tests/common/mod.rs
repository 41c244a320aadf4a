#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use bluetape_api::auth::jwt::{mint_token, JwtConfig};
use bluetape_api::config::ServerConfig;
use bluetape_api::render::HtmlRenderer;
use bluetape_api::router::build_app_router;
use bluetape_api::state::AppState;
use bluetape_api::storage::{FileStorage, LocalFileStorage};
use bluetape_core::roles::Role;
use bluetape_events::{NotificationConfig, NotificationDispatcher};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const MULTIPART_BOUNDARY: &str = "bluetape-test-boundary";

/// A router over a fresh upload directory. Keep the struct alive for the
/// duration of the test so the directory is not removed early.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
}

/// Build a test `ServerConfig` with safe defaults and a 1 MB upload limit.
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            token_ttl_mins: 15,
        },
        upload_dir: upload_dir.path().to_path_buf(),
        max_photo_size_mb: 1,
        app_name: "Blue Tape".to_string(),
    }
}

/// Build the full application router, using the given database pool.
///
/// Notification channels are unconfigured, so every send is simulated.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_storage(pool, |config| {
        Arc::new(LocalFileStorage::new(
            config.upload_dir.clone(),
            config.max_photo_size_mb,
        ))
    })
}

/// Like [`build_test_app`], with the file storage supplied by the caller.
pub fn build_test_app_with_storage(
    pool: PgPool,
    storage: impl FnOnce(&ServerConfig) -> Arc<dyn FileStorage>,
) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(&upload_dir);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: storage(&config),
        notifier: Arc::new(
            NotificationDispatcher::new(NotificationConfig::default(), config.app_name.clone())
                .unwrap(),
        ),
        renderer: Arc::new(HtmlRenderer),
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token_for(user_id: i64, role: Role) -> String {
    let config = JwtConfig {
        secret: TEST_SECRET.to_string(),
        token_ttl_mins: 15,
    };
    mint_token(user_id, role, &config).unwrap()
}

pub fn manager_token() -> String {
    token_for(1, Role::ProjectManager)
}

pub fn viewer_token() -> String {
    token_for(2, Role::Viewer)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: &TestApp, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, builder(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_empty(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, builder(Method::POST, uri, Some(token)).body(Body::empty()).unwrap()).await
}

async fn send_json(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, uri, token, body).await
}

pub async fn put_json(
    app: &TestApp,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PUT, uri, token, body).await
}

/// One part of a multipart body: `(name, filename, content_type, bytes)`.
pub type Part<'a> = (&'a str, Option<&'a str>, Option<&'a str>, &'a [u8]);

pub async fn post_multipart(
    app: &TestApp,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, filename, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        let disposition = match filename {
            Some(filename) => {
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = builder(Method::POST, uri, Some(token))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Upload a photo to an issue.
pub async fn upload_photo(
    app: &TestApp,
    project_id: i64,
    issue_id: i64,
    photo_type: &str,
) -> Response<Body> {
    post_multipart(
        app,
        &format!("/api/v1/projects/{project_id}/issues/{issue_id}/photos"),
        &manager_token(),
        &[
            ("photo_type", None, None, photo_type.as_bytes()),
            ("file", Some("photo.jpg"), Some("image/jpeg"), &b"\xFF\xD8\xFFfake-jpeg"[..]),
        ],
    )
    .await
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// The `data` member of an enveloped response.
pub async fn data(response: Response<Body>) -> serde_json::Value {
    let mut json = body_json(response).await;
    json["data"].take()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a project through the API and return its id.
pub async fn create_project(app: &TestApp, body: serde_json::Value) -> i64 {
    let response = post_json(app, "/api/v1/projects", Some(&manager_token()), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    data(response).await["id"].as_i64().unwrap()
}

/// Create a contractor through the API and return its id.
pub async fn create_contractor(app: &TestApp, body: serde_json::Value) -> i64 {
    let response = post_json(app, "/api/v1/contractors", Some(&manager_token()), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    data(response).await["id"].as_i64().unwrap()
}

/// Create an issue in a project and return its id.
pub async fn create_issue(app: &TestApp, project_id: i64, body: serde_json::Value) -> i64 {
    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/issues"),
        Some(&manager_token()),
        body,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    data(response).await["id"].as_i64().unwrap()
}
