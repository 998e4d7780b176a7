use crate::{config::JwtConfig, errors::ServiceError, models::auth::Claims};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Verifies HS256 tokens sent as `Authorization: <prefix> <token>`
pub struct AuthService {
    jwt_secret: String,
    header_prefix: String,
}

impl AuthService {
    pub fn new(jwt_secret: &str, header_prefix: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            header_prefix: header_prefix.to_string(),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.secret, &config.header_prefix)
    }

    /// Strips the configured scheme word, returning the bare token.
    pub fn token_from_header<'a>(&self, header_value: &'a str) -> Option<&'a str> {
        let (scheme, token) = header_value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case(&self.header_prefix) {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    pub fn verify_header(&self, header_value: &str) -> Result<Claims, ServiceError> {
        let token = self
            .token_from_header(header_value)
            .ok_or_else(|| ServiceError::Auth("Invalid token format".to_string()))?;
        self.verify_token(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| ServiceError::Auth(format!("Invalid token: {}", e)))
    }

    pub fn issue_token(
        &self,
        user_id: i64,
        username: Option<String>,
        valid_for: Duration,
    ) -> Result<String, ServiceError> {
        let claims = Claims {
            user_id,
            username,
            exp: (Utc::now() + valid_for).timestamp().max(0) as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))
    }
}
