use crate::domain::users::Role;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, role: Role, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + expiry_seconds,
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
    }
}

/// Refresh token entity. The signed token string itself is never stored,
/// only its SHA-256 digest.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

/// New refresh token for creation
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
}

/// Repository trait for refresh tokens.
///
/// `find_by_hash` returns expired rows as well; session expiry against the
/// store is the service's decision, so it can distinguish an expired record
/// from a missing one and clean up lazily.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    /// Delete a specific refresh token by hash
    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool>;

    /// Delete all refresh tokens for a user
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64>;

    /// Delete expired refresh tokens
    async fn delete_expired(&self) -> Result<u64>;
}

/// Issues and verifies the signed token pair. Access and refresh tokens are
/// signed under two distinct secrets, so a refresh token never passes access
/// verification and vice versa.
pub trait TokenIssuer: Send + Sync {
    fn generate_access_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String>;

    fn generate_refresh_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String>;

    fn verify_access_token(&self, token: &str) -> Result<Claims>;

    fn verify_refresh_token(&self, token: &str) -> Result<Claims>;

    /// Refresh validity window in seconds. The store record's `expires_at`
    /// is derived from this same value, keeping the signed expiry and the
    /// store expiry a single configuration value.
    fn refresh_token_expiry(&self) -> i64;
}
