use crate::common;
use crate::setup_test_db_or_skip;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use calenfit::presentation::middleware::cors::cors_layer;
use serde_json::{Value, json};
use serial_test::serial;
use tower::ServiceExt;

fn test_app(pool: sqlx::PgPool) -> Router {
    calenfit::presentation::router::app(
        common::create_test_app_state(pool),
        cors_layer().unwrap(),
    )
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_bearer(uri: &str, body: &Value, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return (accessToken, refreshToken).
async fn register_user(app: &Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            &json!({
                "fullName": "Test User",
                "email": email,
                "password": "Secret123!"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    (
        json["data"]["tokens"]["accessToken"].as_str().unwrap().to_string(),
        json["data"]["tokens"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
#[serial]
async fn test_register_success() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            &json!({
                "fullName": "Jane Doe",
                "email": "Jane@Example.com",
                "password": "Secret123!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "jane@example.com");
    assert_eq!(json["data"]["user"]["role"], "USER");
    assert!(json["data"]["user"]["passwordHash"].is_null());
    assert!(json["data"]["tokens"]["accessToken"].is_string());
    assert!(json["data"]["tokens"]["refreshToken"].is_string());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_register_duplicate_email_conflict() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    register_user(&app, "dup@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            &json!({
                "fullName": "Second",
                "email": "DUP@example.com",
                "password": "Secret123!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_login_case_insensitive_email() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    register_user(&app, "new@x.com").await;

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({
                "email": "NEW@x.com",
                "password": "Secret123!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "new@x.com");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_login_wrong_password_unauthorized() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    register_user(&app, "jane@example.com").await;

    let wrong_password = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "jane@example.com", "password": "WrongPass1!"}),
        ))
        .await
        .unwrap();
    let unknown_user = app
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "nobody@example.com", "password": "Secret123!"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    // Same error detail for both, so responses never leak which emails exist.
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_user).await;
    assert_eq!(a["errors"][0]["detail"], b["errors"][0]["detail"]);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_refresh_rotates_and_rejects_replay() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    let (_, old_refresh) = register_user(&app, "rotate@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/refresh",
            &json!({"refreshToken": old_refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let new_refresh = json["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, old_refresh);

    let replay = app
        .oneshot(post_json(
            "/api/auth/refresh",
            &json!({"refreshToken": old_refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_logout_is_idempotent() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    let (_, refresh) = register_user(&app, "logout@example.com").await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/logout",
                &json!({"refreshToken": refresh}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["message"], "Logged out successfully");
    }

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_logout_all_revokes_every_session() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    let (access, _) = register_user(&app, "everywhere@example.com").await;

    // A second session via login.
    let login = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({"email": "everywhere@example.com", "password": "Secret123!"}),
        ))
        .await
        .unwrap();
    let login_json = body_json(login).await;
    let second_refresh = login_json["data"]["tokens"]["refreshToken"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(post_json_bearer("/api/auth/logout-all", &json!({}), &access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Both sessions are gone.
    let refresh = app
        .oneshot(post_json(
            "/api/auth/refresh",
            &json!({"refreshToken": second_refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_me_returns_current_user() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let app = test_app(pool.clone());

    let (access, _) = register_user(&app, "me@example.com").await;

    let response = app
        .oneshot(post_json_bearer("/api/auth/me", &json!({}), &access))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "me@example.com");
    assert_eq!(json["data"]["fullName"], "Test User");

    common::cleanup_test_db(&pool).await;
}
