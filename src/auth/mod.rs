use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};
use crate::models::{Account, Role};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    InvalidEmail(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    MissingSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    expiry_hours: u64,
}

impl JwtKeys {
    /// `expiry_hours` is clamped to `1..=MAX_JWT_EXPIRY_HOURS`
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours: expiry_hours.clamp(1, MAX_JWT_EXPIRY_HOURS),
        }
    }

    fn lifetime(&self) -> Duration {
        // bounded by MAX_JWT_EXPIRY_HOURS
        Duration::hours(self.expiry_hours as i64)
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.lifetime().num_seconds()
    }

    pub fn issue(&self, account: &Account) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role,
            exp: (now + self.lifetime()).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(format!("Invalid JWT token: {}", e)))
    }
}

pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Trimmed, lowercased email with a minimal shape check
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail(format!("'{}' is not a valid email address", email)));
    }
    Ok(email)
}

pub fn check_password_strength(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "coach@example.com".into(),
            role,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("test-secret", 1);
        let account = account(Role::Instructor);
        let token = keys.issue(&account).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, account.id);
        assert_eq!(claims.role, Role::Instructor);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = JwtKeys::new("one", 1).issue(&account(Role::User)).unwrap();
        assert!(matches!(JwtKeys::new("two", 1).verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn huge_expiry_is_clamped_instead_of_overflowing() {
        let keys = JwtKeys::new("test-secret", u64::MAX);
        assert_eq!(keys.expires_in_secs(), MAX_JWT_EXPIRY_HOURS as i64 * 3600);
        let claims = keys.verify(&keys.issue(&account(Role::User)).unwrap()).unwrap();
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        assert!(matches!(JwtKeys::new("", 1).issue(&account(Role::User)), Err(AuthError::MissingSecret)));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Coach@Example.COM ").unwrap(), "coach@example.com");
        assert!(normalize_email("coach").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("coach@localhost").is_err());
    }

    #[test]
    fn password_length_enforced() {
        assert!(check_password_strength("12345", 6).is_err());
        assert!(check_password_strength("123456", 6).is_ok());
    }
}
