use crate::infrastructure::auth::JwtTokenIssuer;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub token_issuer: Arc<JwtTokenIssuer>,
}

impl AppState {
    pub fn new(pool: DbPool, token_issuer: Arc<JwtTokenIssuer>) -> Self {
        Self { pool, token_issuer }
    }
}
