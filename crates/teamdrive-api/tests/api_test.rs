//! HTTP-level tests against the in-memory adapters.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use teamdrive_entity::MemberRole;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["storage"]["provider"], "memory");
}

#[tokio::test]
async fn test_missing_user_header_is_bad_request() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/files", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_webhook_and_listing_flow() {
    let app = TestApp::new();
    let user = app.member(MemberRole::Member);

    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({
                "name": "Docs",
                "visibility": "TEAM",
                "projectId": app.project,
                "teamId": app.team,
            })),
            Some(user),
        )
        .await;
    assert_eq!(folder.status, StatusCode::CREATED);
    assert_eq!(folder.body["type"], "FOLDER");
    assert_eq!(folder.body["status"], "UPLOADED");
    let folder_id = folder.body["id"].as_str().unwrap().to_string();

    let started = app
        .request(
            "POST",
            "/api/files/initiate-upload",
            Some(json!({
                "originalName": "report.pdf",
                "parentId": folder_id,
                "projectId": app.project,
                "teamId": app.team,
            })),
            Some(user),
        )
        .await;
    assert_eq!(started.status, StatusCode::CREATED);
    let storage_key = started.body["storageKey"].as_str().unwrap().to_string();
    assert!(storage_key.ends_with(".pdf"));

    app.blobs.put_object(&storage_key, 321, Some("application/pdf"));
    let hook = app
        .request(
            "POST",
            "/api/webhooks/storage",
            Some(json!({
                "EventName": "s3:ObjectCreated:Put",
                "Records": [
                    {
                        "eventName": "s3:ObjectCreated:Put",
                        "s3": {"object": {"key": urlencoding::encode(&storage_key)}}
                    },
                    {
                        "eventName": "s3:ObjectRemoved:Delete",
                        "s3": {"object": {"key": "other.txt"}}
                    }
                ]
            })),
            None,
        )
        .await;
    assert_eq!(hook.status, StatusCode::OK);
    assert_eq!(hook.body["processed"], 1);
    assert_eq!(hook.body["skipped"], 1);
    assert_eq!(
        app.bus.routing_keys().await,
        vec!["upload.completed", "document.process"]
    );

    let contents = app
        .request(
            "GET",
            &format!("/api/folders/{folder_id}?{}", app.scope_query()),
            None,
            Some(user),
        )
        .await;
    assert_eq!(contents.status, StatusCode::OK);
    let children = contents.body["children"]["data"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["status"], "UPLOADED");
    assert_eq!(children[0]["size"], 321);
    assert_eq!(contents.body["children"]["pagination"]["totalItems"], 1);

    let listing = app
        .request(
            "GET",
            &format!("/api/files?{}&limit=5", app.scope_query()),
            None,
            Some(user),
        )
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["pagination"]["totalItems"], 1);
    assert_eq!(listing.body["pagination"]["limit"], 5);
    assert_eq!(listing.body["data"][0]["originalName"], "Docs");
}

#[tokio::test]
async fn test_error_mapping_over_http() {
    let app = TestApp::new();
    let owner = app.member(MemberRole::Member);
    let other = app.member(MemberRole::Member);

    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({
                "name": "Private",
                "projectId": app.project,
                "teamId": app.team,
            })),
            Some(owner),
        )
        .await;
    let folder_id = folder.body["id"].as_str().unwrap().to_string();

    let forbidden = app
        .request(
            "GET",
            &format!("/api/folders/{folder_id}?{}", app.scope_query()),
            None,
            Some(other),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["error"], "FORBIDDEN");

    let missing = app
        .request(
            "GET",
            &format!("/api/folders/{}?{}", Uuid::new_v4(), app.scope_query()),
            None,
            Some(owner),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let half_scope = app
        .request(
            "GET",
            &format!("/api/files?projectId={}", app.project),
            None,
            Some(owner),
        )
        .await;
    assert_eq!(half_scope.status, StatusCode::BAD_REQUEST);
    assert_eq!(half_scope.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_bulk_routes_take_precedence_over_ids() {
    let app = TestApp::new();
    let user = Uuid::new_v4();

    let folder = app
        .request("POST", "/api/folders", Some(json!({"name": "a"})), Some(user))
        .await;
    assert_eq!(folder.status, StatusCode::CREATED);
    let id = folder.body["id"].as_str().unwrap().to_string();

    let renamed = app
        .request(
            "PATCH",
            "/api/files/bulk",
            Some(json!({"ids": [id], "name": "b"})),
            Some(user),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["matched"], 1);
    assert_eq!(renamed.body["modified"], 1);

    let deleted = app
        .request(
            "DELETE",
            "/api/files/bulk",
            Some(json!({"ids": [id]})),
            Some(user),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["deletedIds"].as_array().unwrap().len(), 1);
    assert_eq!(app.bus.routing_keys().await, vec!["document.deleted"]);
}

#[tokio::test]
async fn test_download_single_file_returns_redirect_plan() {
    let app = TestApp::new();
    let user = Uuid::new_v4();

    let started = app
        .request(
            "POST",
            "/api/files/initiate-upload",
            Some(json!({"originalName": "photo.png"})),
            Some(user),
        )
        .await;
    let file_id = started.body["fileId"].as_str().unwrap().to_string();
    let storage_key = started.body["storageKey"].as_str().unwrap().to_string();
    app.blobs.put_object(&storage_key, 10, Some("image/png"));

    let confirmed = app
        .request("POST", &format!("/api/files/{file_id}/confirm"), None, Some(user))
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["status"], "UPLOADED");

    let plan = app
        .request(
            "POST",
            "/api/files/download",
            Some(json!({"ids": [file_id]})),
            Some(user),
        )
        .await;
    assert_eq!(plan.status, StatusCode::OK);
    assert_eq!(plan.body["kind"], "redirect");
    assert!(plan.body["url"].as_str().unwrap().contains("attachment"));

    let preview = app
        .request(
            "GET",
            &format!("/api/files/{file_id}/preview"),
            None,
            Some(user),
        )
        .await;
    assert_eq!(preview.status, StatusCode::OK);
    assert!(preview.body["url"].as_str().unwrap().contains("inline"));
}

#[tokio::test]
async fn test_huge_page_number_is_not_a_server_error() {
    let app = TestApp::new();
    let user = app.member(MemberRole::Member);

    let listing = app
        .request(
            "GET",
            &format!("/api/files?{}&page={}", app.scope_query(), u64::MAX),
            None,
            Some(user),
        )
        .await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["data"].as_array().unwrap().len(), 0);
}
