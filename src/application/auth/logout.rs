use crate::application::auth::refresh::RefreshTokenRequest;
use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::RefreshTokenRepository;
use crate::shared::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Logout is idempotent: deleting a token that was never stored, already
/// rotated away or expired still reports success, so a double logout and a
/// stale client both get a clean answer.
pub struct LogoutUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutUseCase {
    pub fn new(refresh_token_repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { refresh_token_repo }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: RefreshTokenRequest) -> MessageResponse {
        let token_hash = hash_token(&req.refresh_token);

        if let Err(e) = self.refresh_token_repo.delete_by_hash(&token_hash).await {
            tracing::warn!("Failed to delete refresh token on logout: {:?}", e);
        }

        MessageResponse {
            message: "Logged out successfully".to_string(),
        }
    }
}

/// Invalidates every active session for a user. Already-issued access
/// tokens stay valid until their own expiry; there is no revocation list.
pub struct LogoutAllUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutAllUseCase {
    pub fn new(refresh_token_repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { refresh_token_repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> Result<MessageResponse, AppError> {
        let removed = self
            .refresh_token_repo
            .delete_by_user_id(user_id)
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::debug!(removed, %user_id, "Revoked refresh tokens");

        Ok(MessageResponse {
            message: "Logged out from all devices".to_string(),
        })
    }
}
