use crate::config::Config;
use crate::error::ApiError;
use crate::models::account_models::{Account, LoginRequest, LoginResponse};
use crate::models::db_operations::accounts_db_operations as accounts_db;
use crate::models::Role;
use crate::DbPool;
use actix_web::web;
use bcrypt::BcryptError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Username of the account the token was issued to.
    pub sub: String,
    /// Account id. A token outlives neither its account nor a later account
    /// reusing the username.
    pub uid: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    #[error("Token signing error: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("Bcrypt error: {0}")]
    Hash(#[from] BcryptError),
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Invalid signing secret: {0}")]
    Secret(#[from] hex::FromHexError),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
            SessionError::InvalidToken(_) => ApiError::Unauthorized("Could not validate credentials".into()),
            other => ApiError::internal("Authentication failed", other),
        }
    }
}

/// Verifies passwords and mints or validates signed session tokens.
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    hash_cost: u32,
    // Verified when the username is unknown so both paths cost the same.
    dummy_hash: String,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], token_ttl_minutes: i64, hash_cost: u32) -> Result<Self, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(SessionIssuer {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl: Duration::minutes(token_ttl_minutes),
            hash_cost,
            dummy_hash: bcrypt::hash("shield-placeholder-password", hash_cost)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SessionError> {
        let secret = config.jwt_secret_bytes()?;
        SessionIssuer::new(&secret, config.token_ttl_minutes, config.bcrypt_cost)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, BcryptError> {
        bcrypt::hash(password, self.hash_cost)
    }

    /// Malformed stored hashes count as a mismatch.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        bcrypt::verify(password, password_hash).unwrap_or(false)
    }

    pub fn issue_token(&self, account_id: &str, username: &str, role: Role) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            uid: account_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(SessionError::Signing)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SessionError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(SessionError::InvalidToken)
    }

    /// Checks a username/password pair and records the login time.
    /// Unknown, inactive and wrong-password cases are indistinguishable to the caller.
    pub fn authenticate(&self, conn: &Connection, username: &str, password: &str) -> Result<Account, SessionError> {
        let credentials = accounts_db::read_credentials_by_username(conn, username)?;

        let account = match credentials {
            Some(creds) if creds.account.is_active => {
                if !self.verify_password(password, &creds.password_hash) {
                    return Err(SessionError::InvalidCredentials);
                }
                creds.account
            }
            _ => {
                self.verify_password(password, &self.dummy_hash);
                return Err(SessionError::InvalidCredentials);
            }
        };

        accounts_db::update_last_login(conn, &account.id)?;
        Ok(accounts_db::read_account_by_id(conn, &account.id)?.unwrap_or(account))
    }
}

/// Runs the credential check off the async workers and builds the login response.
pub async fn login(
    pool: web::Data<DbPool>,
    issuer: web::Data<SessionIssuer>,
    request: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let username = request.username.clone();
    let worker_issuer = issuer.clone();

    let outcome = web::block(move || -> Result<Account, SessionError> {
        let conn = pool.get()?;
        worker_issuer.authenticate(&conn, &request.username, &request.password)
    })
    .await
    .map_err(|e| ApiError::internal("Login failed", e))?;

    let account = match outcome {
        Ok(account) => account,
        Err(SessionError::InvalidCredentials) => {
            log::warn!("Rejected login attempt for username '{}'", username);
            return Err(SessionError::InvalidCredentials.into());
        }
        Err(other) => return Err(other.into()),
    };

    let token = issuer.issue_token(&account.id, &account.username, account.role)?;
    log::info!("Account '{}' logged in", account.username);

    Ok(LoginResponse {
        message: "Login successful".to_string(),
        success: true,
        user: account.into(),
        token,
    })
}
