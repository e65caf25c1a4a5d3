use crate::domain::auth::{NewRefreshToken, RefreshTokenRepository, TokenIssuer};
use crate::domain::users::{Role, User};
use crate::shared::error::AppError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Token pair returned by register, login and refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Public user view. The password hash never leaves the service.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserView,
    pub tokens: AuthTokens,
}

/// SHA-256 hex digest of a token string; the store key for refresh tokens.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sign a token pair for the user and persist the refresh half.
///
/// The store record's expiry is derived from the issuer's refresh window,
/// so the signed expiry and the store expiry cannot drift apart.
pub async fn issue_and_store_tokens(
    user: &User,
    token_issuer: &Arc<dyn TokenIssuer>,
    refresh_token_repo: &Arc<dyn RefreshTokenRepository>,
) -> Result<AuthTokens, AppError> {
    let access_token = token_issuer.generate_access_token(user.id, &user.email, user.role)?;
    let refresh_token = token_issuer.generate_refresh_token(user.id, &user.email, user.role)?;

    let expires_at =
        OffsetDateTime::now_utc() + time::Duration::seconds(token_issuer.refresh_token_expiry());

    refresh_token_repo
        .create(NewRefreshToken {
            user_id: user.id,
            token_hash: hash_token(&refresh_token),
            expires_at,
        })
        .await?;

    Ok(AuthTokens {
        access_token,
        refresh_token,
    })
}
