use crate::domain::auth::{Claims, TokenIssuer};
use crate::domain::users::Role;
use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

/// JWT issuer using HS256 with separate access and refresh secrets.
pub struct JwtTokenIssuer {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtTokenIssuer {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
    ) -> Self {
        Self {
            access_encoding_key: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    fn sign(&self, claims: &Claims, key: &EncodingKey) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate_access_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String> {
        let claims = Claims::new(user_id, email, role, self.access_token_expiry);
        self.sign(&claims, &self.access_encoding_key)
    }

    fn generate_refresh_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String> {
        let claims = Claims::new(user_id, email, role, self.refresh_token_expiry);
        self.sign(&claims, &self.refresh_encoding_key)
    }

    fn verify_access_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.access_decoding_key)
    }

    fn verify_refresh_token(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.refresh_decoding_key)
    }

    fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }
}
