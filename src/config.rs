use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    // Populated from the .env file
    pub database_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub jwt_secret_key: String,
    // Defaults live in config/default.toml
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}",
                env_path.display(),
                e
            ))
        })?;

        let database_path = env::var("DATABASE_PATH").map_err(|_| {
            config::ConfigError::Message(
                "FATAL: Environment variable 'DATABASE_PATH' is not set in your .env file.".to_string(),
            )
        })?;

        if Path::new(&database_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "FATAL: The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                database_path
            )));
        }

        let jwt_secret_key = env::var("JWT_SECRET_KEY").map_err(|_| {
            config::ConfigError::Message(
                "FATAL: Environment variable 'JWT_SECRET_KEY' is not set in your .env file.".to_string(),
            )
        })?;

        // 128 hex characters, 64 bytes once decoded.
        if jwt_secret_key.len() != 128 || !jwt_secret_key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(config::ConfigError::Message(
                "FATAL: 'JWT_SECRET_KEY' must be 128 hexadecimal characters long (64 bytes).".to_string(),
            ));
        }

        let token_ttl_minutes = optional_number::<i64>("TOKEN_TTL_MINUTES")?;
        if matches!(token_ttl_minutes, Some(ttl) if ttl <= 0) {
            return Err(config::ConfigError::Message(
                "FATAL: 'TOKEN_TTL_MINUTES' must be a positive number of minutes.".to_string(),
            ));
        }

        let bcrypt_cost = optional_number::<u32>("BCRYPT_COST")?;
        if matches!(bcrypt_cost, Some(cost) if !(4..=31).contains(&cost)) {
            return Err(config::ConfigError::Message(
                "FATAL: 'BCRYPT_COST' must be between 4 and 31.".to_string(),
            ));
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("database_path", database_path)?
            .set_override("jwt_secret_key", jwt_secret_key)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override_option("token_ttl_minutes", token_ttl_minutes)?
            .set_override_option("bcrypt_cost", bcrypt_cost.map(i64::from))?
            .build()?;

        builder.try_deserialize()
    }

    /// Raw bytes of the token signing secret.
    pub fn jwt_secret_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.jwt_secret_key)
    }

    /// SQLite file holding admin accounts.
    pub fn accounts_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("accounts")
            .join("accounts.db")
    }

    /// redb file holding every content collection.
    pub fn content_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("content")
            .join("content.redb")
    }
}

fn optional_number<T: std::str::FromStr>(key: &str) -> Result<Option<T>, config::ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map(Some).map_err(|_| {
            config::ConfigError::Message(format!("FATAL: '{}' must be a number, got '{}'.", key, raw))
        }),
        _ => Ok(None),
    }
}
