//! # Credential Service
//!
//! Password hashing (Argon2id) and signed session tokens (HS256 JWT).
//! The signing secret and token lifetime are injected through [`TokenConfig`]
//! so every test can run with its own secret.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of passwords generated for new employee accounts.
pub const GENERATED_PASSWORD_LEN: usize = 10;

/// Token signing settings.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id, as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("credential operation failed: {0}")]
    Crypto(String),
}

/// Hashes passwords and issues/validates session tokens.
#[derive(Debug, Clone)]
pub struct CredentialService {
    config: TokenConfig,
}

impl CredentialService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Hash a password into an Argon2id PHC string with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Crypto(e.to_string()))
    }

    /// Returns true iff `password` matches `hash`. A malformed hash never matches.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Issue a signed token whose subject is `user_id`, valid for the configured lifetime.
    pub fn issue_token(&self, user_id: i32) -> Result<String, CredentialError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.config.ttl).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.config.secret),
        )
        .map_err(|e| CredentialError::Crypto(format!("token encoding failed: {e}")))
    }

    /// Verify signature and expiry, returning the user id the token was issued for.
    pub fn validate_token(&self, token: &str) -> Result<i32, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let data = jsonwebtoken::decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(&self.config.secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::Expired,
            _ => CredentialError::InvalidToken,
        })?;

        data.claims
            .sub
            .parse::<i32>()
            .map_err(|_| CredentialError::InvalidToken)
    }
}

/// Generate a random alphanumeric password containing at least one letter and one digit.
pub fn generate_password(len: usize) -> String {
    let mut rng = OsRng;

    loop {
        let candidate: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();

        let has_letter = candidate.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
        if len < 2 || (has_letter && has_digit) {
            return candidate;
        }
    }
}
