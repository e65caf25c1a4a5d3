use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::{LogoutAllUseCase, LogoutUseCase, MessageResponse};
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokensUseCase};
use crate::application::auth::register::{RegisterRequest, RegisterUseCase};
use crate::application::auth::token_utils::{AuthResponse, AuthTokens, UserView};
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::CurrentUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Register handler
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RegisterUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
        state.token_issuer,
        Arc::new(PasswordService::new()),
    );

    let response = use_case.execute(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// Login handler
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LoginUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
        state.token_issuer,
        Arc::new(PasswordService::new()),
    );

    let response = use_case.execute(req).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Refresh token handler
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = AuthTokens),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RefreshTokensUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
        state.token_issuer,
    );

    let response = use_case.execute(req).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Logout handler. Succeeds whether or not the token was still stored.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LogoutUseCase::new(Arc::new(PostgresRefreshTokenRepository::new(state.pool)));

    let response = use_case.execute(req).await;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Logout-all handler: revokes every session of the authenticated user.
#[utoipa::path(
    post,
    path = "/api/auth/logout-all",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All sessions revoked", body = MessageResponse),
        (status = 401, description = "Invalid bearer token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout_all(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LogoutAllUseCase::new(Arc::new(PostgresRefreshTokenRepository::new(state.pool)));

    let response = use_case.execute(current_user.user.id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}

/// Current user handler
#[utoipa::path(
    post,
    path = "/api/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserView),
        (status = 401, description = "Invalid bearer token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(current_user: CurrentUser) -> Result<impl IntoResponse, AppError> {
    let view = UserView::from(&current_user.user);

    Ok((StatusCode::OK, Json(ApiResponse::new(view))))
}
