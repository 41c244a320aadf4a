//! HTTP tests for the Home Owner Manual.

mod common;

use axum::http::header::CONTENT_DISPOSITION;
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, create_project, data, get, manager_token, post_multipart, put_json,
    viewer_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn section_template_lists_known_sections(pool: PgPool) {
    let app = common::build_test_app(pool);
    let sections = data(get(&app, "/api/v1/manual/sections", Some(&viewer_token())).await).await;
    let ids: Vec<_> = sections
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.first().map(String::as_str), Some("contacts"));
    assert!(ids.iter().any(|id| id == "warranties"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_is_created_on_first_read(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;

    // Nothing to export yet.
    let response = get(&app, &format!("/api/v1/projects/{project_id}/manual/export"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let manual = data(get(&app, &format!("/api/v1/projects/{project_id}/manual"), Some(&token)).await).await;
    assert_eq!(manual["project_id"], project_id);
    assert_eq!(manual["fields"], json!({}));
    assert_eq!(manual["attachments"], json!([]));

    // Second read returns the same row.
    let again = data(get(&app, &format!("/api/v1/projects/{project_id}/manual"), Some(&token)).await).await;
    assert_eq!(again["id"], manual["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_fields_and_keeps_attachments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let uri = format!("/api/v1/projects/{project_id}/manual");

    let response = put_json(
        &app,
        &uri,
        Some(&token),
        json!({"fields": {"notes": "Water shutoff is under the stairs"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let manual = data(response).await;
    assert_eq!(manual["fields"]["notes"], "Water shutoff is under the stairs");
    assert_eq!(manual["attachments"], json!([]));

    let response = put_json(
        &app,
        &uri,
        Some(&token),
        json!({"attachments": [{"section": "  ", "name": "x", "url": "/uploads/x", "content_type": "application/pdf"}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(&app, &uri, Some(&viewer_token()), json!({"fields": {}})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attachment_upload_appends_to_section(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let uri = format!("/api/v1/projects/{project_id}/manual/attachments");

    let response = post_multipart(
        &app,
        &uri,
        &token,
        &[
            ("section", None, None, &b"warranties"[..]),
            ("name", None, None, &b"Roof warranty"[..]),
            ("file", Some("roof.pdf"), Some("application/pdf"), &b"%PDF-1.4 roof"[..]),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let manual = data(response).await;
    let attachment = &manual["attachments"][0];
    assert_eq!(attachment["section"], "warranties");
    assert_eq!(attachment["name"], "Roof warranty");
    assert_eq!(attachment["content_type"], "application/pdf");
    let url = attachment["url"].as_str().unwrap();
    assert!(app
        .upload_dir
        .path()
        .join(url.trim_start_matches("/uploads/"))
        .exists());

    // Without a display name the file name is used.
    let response = post_multipart(
        &app,
        &uri,
        &token,
        &[
            ("section", None, None, &b"appliances"[..]),
            ("file", Some("fridge.png"), Some("image/png"), &b"\x89PNG"[..]),
        ],
    )
    .await;
    let manual = data(response).await;
    assert_eq!(manual["attachments"].as_array().unwrap().len(), 2);
    assert_eq!(manual["attachments"][1]["name"], "fridge.png");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attachment_requires_section_and_document_type(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let uri = format!("/api/v1/projects/{project_id}/manual/attachments");

    let response = post_multipart(
        &app,
        &uri,
        &token,
        &[("file", Some("roof.pdf"), Some("application/pdf"), &b"%PDF"[..])],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_multipart(
        &app,
        &uri,
        &token,
        &[
            ("section", None, None, &b"notes"[..]),
            ("file", Some("notes.zip"), Some("application/zip"), &b"PK"[..]),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_renders_filled_sections(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;

    put_json(
        &app,
        &format!("/api/v1/projects/{project_id}/manual"),
        Some(&token),
        json!({"fields": {"notes": "Filters <monthly>"}}),
    )
    .await;

    let response = get(&app, &format!("/api/v1/projects/{project_id}/manual/export"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"home_owner_manual_Maple_Court.html\""
    );
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<h2>Additional Notes</h2>"));
    assert!(html.contains("Filters &lt;monthly&gt;"));
    assert!(!html.contains("<h2>Appliances</h2>"));
}
