use crate::application::auth::token_utils::{AuthResponse, UserView, issue_and_store_tokens};
use crate::domain::auth::{RefreshTokenRepository, TokenIssuer};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_issuer: Arc<dyn TokenIssuer>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl LoginUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_issuer: Arc<dyn TokenIssuer>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_issuer,
            password_service,
        }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = req.email.to_lowercase();

        // A missing user and a wrong password produce the same message, so
        // the response never reveals whether the address is registered.
        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid_password = self
            .password_service
            .verify_password(&req.password, &user.password_hash)?;

        if !valid_password {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let tokens =
            issue_and_store_tokens(&user, &self.token_issuer, &self.refresh_token_repo).await?;

        Ok(AuthResponse {
            user: UserView::from(&user),
            tokens,
        })
    }
}
