//! Full session-lifecycle walk over in-memory stores; no database needed.

use crate::common;
use calenfit::application::auth::login::{LoginRequest, LoginUseCase};
use calenfit::application::auth::logout::LogoutAllUseCase;
use calenfit::application::auth::refresh::{RefreshTokenRequest, RefreshTokensUseCase};
use calenfit::application::auth::register::{RegisterRequest, RegisterUseCase};
use calenfit::infrastructure::password::PasswordService;
use calenfit::infrastructure::repositories::mock::{
    MockRefreshTokenRepository, MockUserRepository,
};
use calenfit::shared::error::AppError;
use std::sync::Arc;

#[tokio::test]
async fn test_register_login_refresh_logout_all_flow() {
    let user_repo = Arc::new(MockUserRepository::default());
    let refresh_repo = Arc::new(MockRefreshTokenRepository::default());
    let issuer = common::create_test_issuer();
    let password_service = Arc::new(PasswordService::new());

    let register = RegisterUseCase::new(
        user_repo.clone(),
        refresh_repo.clone(),
        issuer.clone(),
        password_service.clone(),
    );
    let login = LoginUseCase::new(
        user_repo.clone(),
        refresh_repo.clone(),
        issuer.clone(),
        password_service,
    );
    let refresh = RefreshTokensUseCase::new(user_repo.clone(), refresh_repo.clone(), issuer.clone());
    let logout_all = LogoutAllUseCase::new(refresh_repo.clone());

    // Register with a fresh email.
    let registered = register
        .execute(RegisterRequest {
            full_name: "A B".to_string(),
            email: "new@x.com".to_string(),
            password: "Secret123!".to_string(),
        })
        .await
        .expect("register failed");
    let user_id = registered.user.id;
    assert_eq!(registered.user.email, "new@x.com");

    // Login with a differently-cased address.
    let logged_in = login
        .execute(LoginRequest {
            email: "NEW@x.com".to_string(),
            password: "Secret123!".to_string(),
        })
        .await
        .expect("login failed");
    assert_eq!(logged_in.user.id, user_id);
    assert_eq!(refresh_repo.count_for_user(user_id), 2);

    // Refresh rotates: the new refresh token differs from the presented one.
    let old_refresh = logged_in.tokens.refresh_token;
    let rotated = refresh
        .execute(RefreshTokenRequest {
            refresh_token: old_refresh.clone(),
        })
        .await
        .expect("refresh failed");
    assert_ne!(rotated.refresh_token, old_refresh);

    // Logout everywhere, then the rotated token must be unusable.
    logout_all.execute(user_id).await.expect("logout-all failed");
    assert_eq!(refresh_repo.count_for_user(user_id), 0);

    let result = refresh
        .execute(RefreshTokenRequest {
            refresh_token: rotated.refresh_token,
        })
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}
