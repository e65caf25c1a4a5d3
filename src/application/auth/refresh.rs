use crate::application::auth::token_utils::{AuthTokens, hash_token, issue_and_store_tokens};
use crate::domain::auth::{RefreshTokenRepository, TokenIssuer};
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

pub struct RefreshTokensUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl RefreshTokensUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_issuer,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: RefreshTokenRequest) -> Result<AuthTokens, AppError> {
        // Signature and signed-expiry check under the refresh secret.
        let claims = self
            .token_issuer
            .verify_refresh_token(&req.refresh_token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        // The store is authoritative for rotation and revocation: a token
        // that verifies but has no record has already been redeemed or
        // revoked.
        let token_hash = hash_token(&req.refresh_token);
        let stored = self
            .refresh_token_repo
            .find_by_hash(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        let user_id = claims.user_id().map_err(AppError::InternalServerError)?;
        if stored.user_id != user_id {
            return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
        }

        // Store-level expiry, lazily cleaned up.
        if stored.expires_at < OffsetDateTime::now_utc() {
            self.refresh_token_repo
                .delete_by_hash(&token_hash)
                .await
                .map_err(AppError::InternalServerError)?;
            return Err(AppError::Unauthorized("Refresh token expired".to_string()));
        }

        let user = self
            .user_repo
            .find_by_id(stored.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

        // A disabled account drops the record too; reactivation starts from
        // a fresh login.
        if !user.is_active {
            self.refresh_token_repo
                .delete_by_hash(&token_hash)
                .await
                .map_err(AppError::InternalServerError)?;
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        // Rotation: a presented refresh token is redeemable exactly once.
        self.refresh_token_repo
            .delete_by_hash(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?;

        issue_and_store_tokens(&user, &self.token_issuer, &self.refresh_token_repo).await
    }
}
