use crate::common;
use crate::setup_test_db_or_skip;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use calenfit::presentation::middleware::cors::cors_layer;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn test_health_check_healthy() {
    let pool = setup_test_db_or_skip!();
    let app = calenfit::presentation::router::app(
        common::create_test_app_state(pool),
        cors_layer().unwrap(),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_unhealthy_without_database() {
    let app = calenfit::presentation::router::app(
        common::create_lazy_app_state(),
        cors_layer().unwrap(),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
