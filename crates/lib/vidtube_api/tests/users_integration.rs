//! Integration tests for registration, login and account self-service.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn register_returns_public_projection() {
    let app = app();
    let reply = register(&app, "Alice", "Pw1").await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.json["username"], "alice");
    assert_eq!(reply.json["email"], "alice@x.com");
    assert!(reply.json.get("passwordHash").is_none());
    assert!(reply.json.get("password").is_none());
    assert!(reply.json.get("refreshToken").is_none());
}

#[tokio::test]
async fn register_rejects_duplicates_and_missing_fields() {
    let app = app();
    register(&app, "alice", "Pw1").await;

    let dup = register(&app, "alice", "Pw1").await;
    assert_eq!(dup.status, StatusCode::CONFLICT);

    let missing = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "fullName": "B", "email": "b@x.com", "password": "Pw1" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json["message"], "username is required");

    let bad_email = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({ "fullName": "B", "email": "nope", "username": "bob", "password": "Pw1" })),
    )
    .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_sets_cookies_and_returns_tokens() {
    let app = app();
    let reply = signed_in(&app, "alice").await;

    let access = access_of(&reply);
    let refresh = refresh_of(&reply);
    assert_ne!(access, refresh);
    assert_eq!(reply.cookie("accessToken").as_deref(), Some(access.as_str()));
    assert_eq!(reply.cookie("refreshToken").as_deref(), Some(refresh.as_str()));
    assert!(
        reply
            .set_cookies
            .iter()
            .all(|c| c.contains("HttpOnly") && c.contains("Secure"))
    );
    assert_eq!(reply.json["user"]["username"], "alice");
    assert_eq!(reply.json["tokenType"], "Bearer");
}

#[tokio::test]
async fn login_by_email_is_case_insensitive() {
    let app = app();
    register(&app, "alice", "Pw1").await;
    let reply = login(&app, "ALICE@X.COM", "Pw1").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_map_to_404_and_401() {
    let app = app();
    register(&app, "alice", "Pw1").await;

    let unknown = login(&app, "nobody", "Pw1").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.json["message"], "User does not exist");

    let wrong = login(&app, "alice", "pw1").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json["message"], "Invalid user credentials");
    assert!(wrong.set_cookies.is_empty());

    let blank = login(&app, "", "Pw1").await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_route_accepts_bearer_or_cookie() {
    let app = app();
    let reply = signed_in(&app, "alice").await;
    let access = access_of(&reply);

    let via_header = send(&app, "GET", "/api/v1/users/user-details", Some(&bearer(&access)), None).await;
    assert_eq!(via_header.status, StatusCode::OK);
    assert_eq!(via_header.json["username"], "alice");

    let cookie = format!("accessToken={access}");
    let via_cookie = send(&app, "GET", "/api/v1/users/user-details", Some(&cookie), None).await;
    assert_eq!(via_cookie.status, StatusCode::OK);
    assert!(via_cookie.json.get("passwordHash").is_none());
}

#[tokio::test]
async fn protected_route_rejects_missing_or_bad_tokens() {
    let app = app();
    let reply = signed_in(&app, "alice").await;

    let none = send(&app, "GET", "/api/v1/users/user-details", None, None).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);
    assert_eq!(none.json["message"], "Missing token");

    let garbage = send(&app, "GET", "/api/v1/users/user-details", Some("Bearer abc"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.json["message"], "Invalid or expired token");

    // A refresh token is signed with a different secret.
    let refresh = refresh_of(&reply);
    let wrong_class = send(
        &app,
        "GET",
        "/api/v1/users/user-details",
        Some(&bearer(&refresh)),
        None,
    )
    .await;
    assert_eq!(wrong_class.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_ends_session() {
    let app = app();
    let reply = signed_in(&app, "alice").await;
    let auth = bearer(&access_of(&reply));

    let wrong_old = send(
        &app,
        "POST",
        "/api/v1/users/update-password",
        Some(&auth),
        Some(json!({ "oldPassword": "nope", "newPassword": "Pw2" })),
    )
    .await;
    assert_eq!(wrong_old.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_old.json["message"], "Invalid old password");

    let changed = send(
        &app,
        "POST",
        "/api/v1/users/update-password",
        Some(&auth),
        Some(json!({ "oldPassword": "Pw1", "newPassword": "Pw2" })),
    )
    .await;
    assert_eq!(changed.status, StatusCode::OK);

    let stale = send(
        &app,
        "POST",
        "/api/v1/users/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh_of(&reply) })),
    )
    .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    assert_eq!(login(&app, "alice", "Pw1").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(login(&app, "alice", "Pw2").await.status, StatusCode::OK);
}

#[tokio::test]
async fn update_details_and_media() {
    let app = app();
    register(&app, "bob", "Pw1").await;
    let reply = signed_in(&app, "alice").await;
    let auth = bearer(&access_of(&reply));

    let taken = send(
        &app,
        "PATCH",
        "/api/v1/users/update-details",
        Some(&auth),
        Some(json!({ "fullName": "Alice A", "email": "bob@x.com" })),
    )
    .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let updated = send(
        &app,
        "PATCH",
        "/api/v1/users/update-details",
        Some(&auth),
        Some(json!({ "fullName": "Alice A", "email": "Alice@New.com" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json["fullName"], "Alice A");
    assert_eq!(updated.json["email"], "alice@new.com");

    let avatar = send(
        &app,
        "PATCH",
        "/api/v1/users/update-avatar",
        Some(&auth),
        Some(json!({ "avatar": "https://media.example/a.png" })),
    )
    .await;
    assert_eq!(avatar.status, StatusCode::OK);
    assert_eq!(avatar.json["avatar"], "https://media.example/a.png");

    let cover = send(
        &app,
        "PATCH",
        "/api/v1/users/update-coverimage",
        Some(&auth),
        Some(json!({ "coverImage": "" })),
    )
    .await;
    assert_eq!(cover.status, StatusCode::BAD_REQUEST);
}
