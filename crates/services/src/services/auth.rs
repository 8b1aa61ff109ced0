use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use db::{
    models::user::{CreateUser, User},
    DbErr, DbPool,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("Name, email and password are required")]
    MissingFields,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Token encoding failed: {0}")]
    TokenEncoding(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

pub type Result<T> = std::result::Result<T, AuthServiceError>;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct AuthService {
    token_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(token_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            token_secret,
            token_ttl_hours,
        }
    }

    pub async fn register(
        &self,
        pool: &DbPool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String)> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthServiceError::MissingFields);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::PasswordTooShort);
        }
        if User::find_by_email(pool, &email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        let password_hash = self.hash_password(password)?;
        let user = User::create(
            pool,
            &CreateUser {
                name: name.to_string(),
                email,
                password_hash,
            },
        )
        .await?;
        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    pub async fn login(&self, pool: &DbPool, email: &str, password: &str) -> Result<(User, String)> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthServiceError::MissingFields);
        }

        let user = User::find_by_email(pool, &email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;
        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.token_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Returns the user id the token was issued for.
    pub fn verify_token(&self, token: &str) -> Result<Uuid> {
        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.token_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthServiceError::InvalidToken)?;
        Ok(data.claims.sub)
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AuthServiceError::Hashing(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|err| AuthServiceError::Hashing(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
