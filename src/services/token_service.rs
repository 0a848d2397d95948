use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::prelude::*;
use std::fmt;

use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::internal::{Claims, Role};

/// Issues and validates signed session tokens
///
/// A token is an HS256 JWT carrying the user id, role and session id. It is
/// only honored while its session row exists, so logout can revoke it before
/// it expires.
pub struct TokenService {
    jwt_secret: String,
    session_ttl_seconds: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String, session_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            session_ttl_seconds: session_ttl_hours * 60 * 60,
        }
    }

    /// Generate a random, URL-safe session id (32 bytes of entropy)
    pub fn generate_session_id(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Unix timestamp at which a session created now expires
    pub fn session_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.session_ttl_seconds
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Sign a token for the given user and session
    pub fn issue_token(
        &self,
        user_id: &str,
        role: Role,
        session_id: &str,
        expires_at: i64,
    ) -> Result<String, InternalError> {
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            sid: session_id.to_string(),
            exp: expires_at,
            iat: Utc::now().timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("sign_token", e.to_string()))
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, InternalError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(CredentialError::ExpiredToken),
            _ => InternalError::from(CredentialError::InvalidToken(e.to_string())),
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .finish()
    }
}
