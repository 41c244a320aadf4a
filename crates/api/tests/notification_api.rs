//! HTTP tests for contractor notifications and reminders.
//!
//! No SMTP or SMS gateway is configured, so channels report `simulated`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_contractor, create_issue, create_project, data, get, manager_token,
    post_empty, post_json, viewer_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn notify_without_contact_info_is_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let contractor_id = create_contractor(&app, json!({"company": "Ghost Builders"})).await;
    let issue_id = create_issue(
        &app,
        project_id,
        json!({"category": "Paint", "contractor_id": contractor_id}),
    )
    .await;

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/issues/{issue_id}/notify"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "MISSING_CONTACT_INFO");

    let issue = data(
        get(
            &app,
            &format!("/api/v1/projects/{project_id}/issues/{issue_id}"),
            Some(&token),
        )
        .await,
    )
    .await;
    assert!(issue["notification_sent_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notify_issue_without_contractor_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let issue_id = create_issue(&app, project_id, json!({"category": "Paint"})).await;

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/issues/{issue_id}/notify"),
        &manager_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn simulated_notification_stamps_issue(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let contractor_id = create_contractor(
        &app,
        json!({"company": "Pipe Pros", "email": "office@pipepros.test", "phone": "+15550100"}),
    )
    .await;
    let issue_id = create_issue(
        &app,
        project_id,
        json!({"category": "Plumbing", "contractor_id": contractor_id, "priority": "high"}),
    )
    .await;

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/issues/{issue_id}/notify"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = data(response).await;
    assert_eq!(result["contractor_id"], contractor_id);
    assert_eq!(result["channels"]["email"]["status"], "simulated");
    assert_eq!(result["channels"]["sms"]["status"], "simulated");
    assert!(result["notification_sent_at"].is_string());

    let issue = data(
        get(
            &app,
            &format!("/api/v1/projects/{project_id}/issues/{issue_id}"),
            Some(&token),
        )
        .await,
    )
    .await;
    assert_eq!(issue["notification_sent_at"], result["notification_sent_at"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_cannot_notify(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let issue_id = create_issue(&app, project_id, json!({"category": "Paint"})).await;

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/issues/{issue_id}/notify"),
        &viewer_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reminder_counts_unclosed_issues(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let contractor_id = create_contractor(
        &app,
        json!({"company": "Pipe Pros", "email": "office@pipepros.test"}),
    )
    .await;
    for category in ["Plumbing", "Plumbing"] {
        create_issue(
            &app,
            project_id,
            json!({"category": category, "contractor_id": contractor_id}),
        )
        .await;
    }
    create_issue(&app, project_id, json!({"category": "Paint"})).await;

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/assignments"),
        Some(&token),
        json!({"contractor_id": contractor_id}),
    )
    .await;
    let assignment_id = data(response).await["id"].as_i64().unwrap();

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/assignments/{assignment_id}/remind"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result = data(response).await;
    assert_eq!(result["pending_issues"], 2);
    assert_eq!(result["channels"]["email"]["status"], "simulated");
    assert!(result["channels"]["sms"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reminder_for_missing_assignment_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;

    let response = post_empty(
        &app,
        &format!("/api/v1/projects/{project_id}/assignments/999999/remind"),
        &manager_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
