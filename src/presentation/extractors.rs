use crate::domain::auth::TokenIssuer;
use crate::domain::users::{User, UserRepository};
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated user extractor.
///
/// Verifies the bearer access token, then resolves the user from the store
/// on every request rather than trusting the claims: a deactivated account
/// is locked out immediately at the cost of one lookup per request.
pub struct CurrentUser {
    pub user: User,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .token_issuer
            .verify_access_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let user_id = claims
            .user_id()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        let user = PostgresUserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                AppError::Unauthorized("User not found or account disabled".to_string())
            })?;

        Ok(CurrentUser { user })
    }
}
