//! HTTP tests for projects, areas and contractor assignments.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_contractor, create_issue, create_project, data, delete, get, manager_token,
    post_json, put_json, upload_photo,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_seeds_areas_and_assignments(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    create_contractor(&app, json!({"company": "Bright Sparks"})).await;
    create_contractor(&app, json!({"company": "Pipe Pros"})).await;

    let response = post_json(
        &app,
        "/api/v1/projects",
        Some(&token),
        json!({
            "name": "Maple Court",
            "address": "5 Maple Ct",
            "create_default_areas": true,
            "assign_all_contractors": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = data(response).await;
    assert_eq!(project["status"], "active");
    assert_eq!(project["contractors_assigned"], 2);
    let areas_created = project["areas_created"].as_u64().unwrap();
    assert!(areas_created > 0);

    let id = project["id"].as_i64().unwrap();
    let areas = data(get(&app, &format!("/api/v1/projects/{id}/areas"), Some(&token)).await).await;
    assert_eq!(areas.as_array().unwrap().len() as u64, areas_created);
    assert_eq!(areas[0]["order"], 0);

    let assignments =
        data(get(&app, &format!("/api/v1/projects/{id}/assignments"), Some(&token)).await).await;
    assert_eq!(assignments.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_without_flags_seeds_nothing(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/projects",
        Some(&manager_token()),
        json!({"name": "Bare", "address": "1 Empty Lot", "status": "delivered"}),
    )
    .await;
    let project = data(response).await;
    assert_eq!(project["status"], "delivered");
    assert_eq!(project["areas_created"], 0);
    assert_eq!(project["contractors_assigned"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_requires_name_and_address(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/v1/projects",
        Some(&manager_token()),
        json!({"name": "", "address": "5 Maple Ct"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_list_filters_and_pages(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    create_project(&app, json!({"name": "Oak Row", "address": "9 Oak Row"})).await;
    create_project(
        &app,
        json!({"name": "Pine Hill", "address": "2 Pine Hill", "status": "archived"}),
    )
    .await;

    let page = data(get(&app, "/api/v1/projects?status=active", Some(&token)).await).await;
    assert_eq!(page["total"], 2);

    let page = data(get(&app, "/api/v1/projects?search=oak", Some(&token)).await).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Oak Row");

    let page = data(get(&app, "/api/v1/projects?limit=1", Some(&token)).await).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_missing_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{id}"),
        Some(&token),
        json!({"status": "delivered", "unit": "4B"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = data(response).await;
    assert_eq!(project["status"], "delivered");
    assert_eq!(project["unit"], "4B");
    assert_eq!(project["name"], "Maple Court");

    let response = get(&app, "/api/v1/projects/999999", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_removes_stored_photos(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let issue_id = create_issue(&app, project_id, json!({"category": "Paint"})).await;

    let response = upload_photo(&app, project_id, issue_id, "before").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = data(response).await;
    let stored = app
        .upload_dir
        .path()
        .join(photo["url"].as_str().unwrap().trim_start_matches("/uploads/"));
    assert!(stored.exists());

    let response = delete(&app, &format!("/api/v1/projects/{project_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!stored.exists());

    let response = get(&app, &format!("/api/v1/projects/{project_id}/issues/{issue_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Areas
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn custom_areas_append_and_reorder(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let areas_uri = format!("/api/v1/projects/{project_id}/areas");

    let mut ids = Vec::new();
    for name in ["Kitchen", "  Garage  ", "Attic"] {
        let response = post_json(&app, &areas_uri, Some(&token), json!({"name": name})).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let area = data(response).await;
        assert_eq!(area["is_custom"], true);
        ids.push(area["id"].as_i64().unwrap());
    }

    let areas = data(get(&app, &areas_uri, Some(&token)).await).await;
    assert_eq!(areas[1]["name"], "Garage");
    assert_eq!(areas[2]["order"], 2);

    let response = put_json(
        &app,
        &format!("{areas_uri}/reorder"),
        Some(&token),
        json!({"area_ids": [ids[2], ids[0], ids[1]]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let areas = data(response).await;
    let names: Vec<_> = areas.as_array().unwrap().iter().map(|a| a["name"].clone()).collect();
    assert_eq!(names, vec![json!("Attic"), json!("Kitchen"), json!("Garage")]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn area_routes_are_scoped_to_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let first = create_project(&app, json!({"name": "A", "address": "1 A St"})).await;
    let second = create_project(&app, json!({"name": "B", "address": "2 B St"})).await;

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{first}/areas"),
        Some(&token),
        json!({"name": "Kitchen"}),
    )
    .await;
    let area_id = data(response).await["id"].as_i64().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{second}/areas/{area_id}"),
        Some(&token),
        json!({"name": "Stolen"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, &format!("/api/v1/projects/{first}/areas/{area_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_assignment_is_409(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let contractor_id = create_contractor(&app, json!({"company": "Pipe Pros"})).await;
    let uri = format!("/api/v1/projects/{project_id}/assignments");

    let response = post_json(
        &app,
        &uri,
        Some(&token),
        json!({"contractor_id": contractor_id, "trades": ["Plumbing"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let assignment = data(response).await;
    assert_eq!(assignment["company"], "Pipe Pros");
    assert_eq!(assignment["trades"], json!(["Plumbing"]));

    let response = post_json(&app, &uri, Some(&token), json!({"contractor_id": contractor_id})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_ASSIGNMENT");

    let response = post_json(&app, &uri, Some(&token), json!({"contractor_id": 999999})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assignment_update_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = manager_token();
    let project_id = create_project(&app, json!({"name": "Maple Court", "address": "5 Maple Ct"})).await;
    let contractor_id = create_contractor(&app, json!({"company": "Pipe Pros"})).await;

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/assignments"),
        Some(&token),
        json!({"contractor_id": contractor_id}),
    )
    .await;
    let assignment_id = data(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/projects/{project_id}/assignments/{assignment_id}");

    let response = put_json(
        &app,
        &uri,
        Some(&token),
        json!({"trades": ["Plumbing", "HVAC"], "notes": "Main floor only"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = data(response).await;
    assert_eq!(updated["trades"], json!(["Plumbing", "HVAC"]));
    assert_eq!(updated["notes"], "Main floor only");

    let response = delete(&app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(&app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
