use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// JWT Claims structure for admin bearer tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin subject (operator identity)
    pub tid: Uuid,   // tenant id
    pub role: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Roles accepted by the admin API
pub const ROLE_TENANT_ADMIN: &str = "tenant_admin";
pub const ROLE_PLATFORM_ADMIN: &str = "platform_admin";

pub struct AuthService;

impl AuthService {
    /// Generate an admin token for a tenant.
    /// In production tokens are minted by the identity provider; this is used
    /// by local tooling and the test suite.
    pub fn generate_token(
        tenant_id: Uuid,
        subject: &str,
        role: &str,
        config: &Config,
    ) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + Duration::hours(config.jwt_expiration_hours);

        let claims = Claims {
            sub: subject.to_string(),
            tid: tenant_id,
            role: role.to_string(),
            exp: exp.unix_timestamp(),
            iat: now.unix_timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(token)
    }

    /// Verify and decode an admin token
    pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
