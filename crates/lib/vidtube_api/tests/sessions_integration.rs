//! Integration tests for refresh-token rotation and logout.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn refresh_with_body(app: &axum::Router, token: &str) -> Reply {
    send(
        app,
        "POST",
        "/api/v1/users/refresh-token",
        None,
        Some(json!({ "refreshToken": token })),
    )
    .await
}

#[tokio::test]
async fn refresh_rotates_and_supersedes_previous_token() {
    let app = app();
    let first = signed_in(&app, "alice").await;
    let t1 = refresh_of(&first);

    let second = refresh_with_body(&app, &t1).await;
    assert_eq!(second.status, StatusCode::OK);
    let t2 = refresh_of(&second);
    assert_ne!(t1, t2);
    assert_eq!(second.cookie("refreshToken").as_deref(), Some(t2.as_str()));

    // The new access token works.
    let me = send(
        &app,
        "GET",
        "/api/v1/users/user-details",
        Some(&bearer(&access_of(&second))),
        None,
    )
    .await;
    assert_eq!(me.status, StatusCode::OK);

    // Replaying the first token fails and does not disturb the live one.
    let replay = refresh_with_body(&app, &t1).await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.json["message"], "Refresh token expired or superseded");

    let third = refresh_with_body(&app, &t2).await;
    assert_eq!(third.status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_reads_cookie_before_body() {
    let app = app();
    let login = signed_in(&app, "alice").await;
    let cookie = format!("refreshToken={}", refresh_of(&login));

    let reply = send(
        &app,
        "POST",
        "/api/v1/users/refresh-token",
        Some(&cookie),
        Some(json!({ "refreshToken": "ignored" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    // Cookie alone, empty body.
    let cookie = format!("refreshToken={}", refresh_of(&reply));
    let again = send(&app, "POST", "/api/v1/users/refresh-token", Some(&cookie), None).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_missing_and_invalid_tokens() {
    let app = app();
    let login = signed_in(&app, "alice").await;

    let missing = send(&app, "POST", "/api/v1/users/refresh-token", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json["message"], "Missing refresh token");

    let garbage = refresh_with_body(&app, "not-a-token").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.json["message"], "Invalid refresh token");

    // Access tokens are not accepted as refresh tokens.
    let wrong_class = refresh_with_body(&app, &access_of(&login)).await;
    assert_eq!(wrong_class.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_login_supersedes_first_session() {
    let app = app();
    let first = signed_in(&app, "alice").await;
    let second = login(&app, "alice", "Pw1").await;
    assert_eq!(second.status, StatusCode::OK);

    assert_eq!(
        refresh_with_body(&app, &refresh_of(&first)).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        refresh_with_body(&app, &refresh_of(&second)).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn logout_clears_cookies_and_revokes_refresh() {
    let app = app();
    let login = signed_in(&app, "alice").await;

    let out = send(
        &app,
        "POST",
        "/api/v1/users/logout",
        Some(&bearer(&access_of(&login))),
        None,
    )
    .await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.json["success"], true);
    assert_eq!(out.cookie("accessToken").as_deref(), Some(""));
    assert_eq!(out.cookie("refreshToken").as_deref(), Some(""));

    let after = refresh_with_body(&app, &refresh_of(&login)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_requires_authentication() {
    let app = app();
    let out = send(&app, "POST", "/api/v1/users/logout", None, None).await;
    assert_eq!(out.status, StatusCode::UNAUTHORIZED);
}
