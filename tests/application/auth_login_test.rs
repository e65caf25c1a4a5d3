use crate::common;
use crate::setup_test_db_or_skip;
use calenfit::application::auth::login::{LoginRequest, LoginUseCase};
use calenfit::domain::password::PasswordHashingService;
use calenfit::domain::users::{NewUser, UserRepository};
use calenfit::infrastructure::password::PasswordService;
use calenfit::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use calenfit::infrastructure::repositories::users::PostgresUserRepository;
use calenfit::shared::error::AppError;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_login_success() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let refresh_repo = Arc::new(PostgresRefreshTokenRepository::new(pool.clone()));
    let password_service = Arc::new(PasswordService::new());

    let hash = password_service.hash_password("Secret123!").unwrap();
    user_repo
        .create(NewUser {
            email: "login@example.com".to_string(),
            password_hash: hash,
            full_name: "Login User".to_string(),
        })
        .await
        .expect("Failed to create user");

    let use_case = LoginUseCase::new(
        user_repo,
        refresh_repo,
        common::create_test_issuer(),
        password_service,
    );

    let response = use_case
        .execute(LoginRequest {
            email: "login@example.com".to_string(),
            password: "Secret123!".to_string(),
        })
        .await
        .expect("Login failed");

    assert!(!response.tokens.access_token.is_empty());
    assert!(!response.tokens.refresh_token.is_empty());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_login_invalid_credentials() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let use_case = LoginUseCase::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(pool.clone())),
        common::create_test_issuer(),
        Arc::new(PasswordService::new()),
    );

    let result = use_case
        .execute(LoginRequest {
            email: "nonexistent@example.com".to_string(),
            password: "Secret123!".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));

    common::cleanup_test_db(&pool).await;
}
