//! Integration tests for owned video resources and the ownership guard.

mod common;

use axum::Router;
use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn upload(app: &Router, auth: &str) -> Reply {
    send(
        app,
        "POST",
        "/api/v1/videos/upload",
        Some(auth),
        Some(json!({
            "title": "First",
            "description": "A video",
            "videoFile": "https://media.example/v.mp4",
            "thumbnail": "https://media.example/t.png",
            "duration": 12.5,
        })),
    )
    .await
}

#[tokio::test]
async fn upload_requires_authentication_and_fields() {
    let app = app();
    let anonymous = send(&app, "POST", "/api/v1/videos/upload", None, Some(json!({}))).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let alice = bearer(&access_of(&signed_in(&app, "alice").await));
    let missing = send(
        &app,
        "POST",
        "/api/v1/videos/upload",
        Some(&alice),
        Some(json!({ "title": "T" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json["message"], "description is required");
}

#[tokio::test]
async fn uploaded_video_is_publicly_readable() {
    let app = app();
    let login = signed_in(&app, "alice").await;
    let alice = bearer(&access_of(&login));

    let created = upload(&app, &alice).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json["owner"], login.json["user"]["id"]);
    assert_eq!(created.json["isPublished"], true);

    let id = created.json["id"].as_str().unwrap();
    let fetched = send(&app, "GET", &format!("/api/v1/videos/video/{id}"), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json["title"], "First");

    let bad_id = send(&app, "GET", "/api/v1/videos/video/not-a-uuid", None, None).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_owner_may_toggle_publish() {
    let app = app();
    let alice = bearer(&access_of(&signed_in(&app, "alice").await));
    let bob = bearer(&access_of(&signed_in(&app, "bob").await));

    let created = upload(&app, &alice).await;
    let uri = format!(
        "/api/v1/videos/video/togglepublish/{}",
        created.json["id"].as_str().unwrap()
    );

    let denied = send(&app, "PUT", &uri, Some(&bob), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.json["message"], "not resource owner");

    let toggled = send(&app, "PUT", &uri, Some(&alice), None).await;
    assert_eq!(toggled.status, StatusCode::OK);
    assert_eq!(toggled.json["isPublished"], false);
}

#[tokio::test]
async fn only_owner_may_update_or_delete() {
    let app = app();
    let alice = bearer(&access_of(&signed_in(&app, "alice").await));
    let bob = bearer(&access_of(&signed_in(&app, "bob").await));

    let created = upload(&app, &alice).await;
    let uri = format!("/api/v1/videos/video/{}", created.json["id"].as_str().unwrap());

    let denied = send(&app, "PATCH", &uri, Some(&bob), Some(json!({ "title": "Mine" }))).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let denied = send(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let anonymous = send(&app, "DELETE", &uri, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let renamed = send(&app, "PATCH", &uri, Some(&alice), Some(json!({ "title": "Renamed" }))).await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.json["title"], "Renamed");
    assert_eq!(renamed.json["description"], "A video");

    let deleted = send(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = send(&app, "GET", &uri, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
