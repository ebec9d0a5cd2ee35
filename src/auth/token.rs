use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::AuthClaims;
use crate::account::models::AccountRole;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub ttl_minutes: i64,
}

impl TokenConfig {
    pub fn new() -> Self {
        // Allow configuring the lifetime via env var, default to 60 minutes
        let ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            ttl_minutes,
        }
    }

    /// Creates a token config with an explicit secret and lifetime,
    /// bypassing the environment. Used by tests.
    pub fn with_secret(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_minutes,
        }
    }

    /// Creates a new JWT token for the given account identity
    #[instrument(skip(self, name))]
    pub fn create_token(
        &self,
        user_id: i64,
        name: &str,
        role: AccountRole,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.ttl_minutes)).timestamp() as usize;

        debug!(
            ttl_minutes = self.ttl_minutes,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = AuthClaims {
            sub: user_id,
            name: name.to_string(),
            role,
            exp,
            iat: now.timestamp() as usize,
        };

        self.encode_claims(&claims)
    }

    /// Reissues a token for the same identity with a fresh issued-at/expiry
    /// pair. Used by the sliding-refresh middleware.
    #[instrument(skip(self, claims))]
    pub fn refresh_token(&self, claims: &AuthClaims) -> Result<String, AppError> {
        debug!(sub = claims.sub, "Reissuing token with a fresh window");
        self.create_token(claims.sub, &claims.name, claims.role)
    }

    /// Signs a fully specified claims set
    pub fn encode_claims(&self, claims: &AuthClaims) -> Result<String, AppError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid.
    /// Bad signatures and expired tokens both fail here.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        debug!("Decoding and validating JWT token");

        decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(
                sub = data.claims.sub,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new()
    }
}
