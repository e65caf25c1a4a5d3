use crate::application::auth::token_utils::{AuthResponse, UserView, issue_and_store_tokens};
use crate::domain::auth::{RefreshTokenRepository, TokenIssuer};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{NewUser, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "Full name must be 2-100 characters"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

pub struct RegisterUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_issuer: Arc<dyn TokenIssuer>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl RegisterUseCase {
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
    pub async fn execute(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let email = req.email.to_lowercase();

        let existing = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(AppError::InternalServerError)?;

        if existing.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = self.password_service.hash_password(&req.password)?;

        // The existence check and the insert are separate store calls; a
        // concurrent duplicate registration is stopped by the unique index
        // and surfaced as the same conflict.
        let user = match self
            .user_repo
            .create(NewUser {
                email,
                password_hash,
                full_name: req.full_name,
            })
            .await
        {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict("Email is already registered".to_string()));
            }
            Err(e) => return Err(AppError::InternalServerError(e)),
        };

        let tokens =
            issue_and_store_tokens(&user, &self.token_issuer, &self.refresh_token_repo).await?;

        Ok(AuthResponse {
            user: UserView::from(&user),
            tokens,
        })
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
