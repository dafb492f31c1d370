use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub seed_demo_data: bool,
}

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Bearer token signing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens.
    /// When unset a random secret is generated at startup.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub token_expiry_hours: i64,
}

/// Screenshot upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where screenshots are written and served from
    pub dir: PathBuf,
    /// Maximum accepted attachment size in bytes
    pub max_file_size: usize,
}

const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 10;
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;
/// One year
pub const MAX_TOKEN_EXPIRY_HOURS: i64 = 24 * 365;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            uploads: UploadConfig::from_env()?,
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            acquire_timeout: Duration::from_secs(
                env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            ),
            idle_timeout: Duration::from_secs(
                env::var("DATABASE_IDLE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .unwrap_or(600),
            ),
            max_lifetime: Duration::from_secs(
                env::var("DATABASE_MAX_LIFETIME_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse()
                    .unwrap_or(1800),
            ),
        })
    }
}

impl AuthConfig {
    /// Load token configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").ok();

        if matches!(&jwt_secret, Some(secret) if secret.is_empty()) {
            return Err(ConfigError::EmptyJwtSecret);
        }

        let token_expiry_hours = env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_HOURS.to_string())
            .parse()
            .unwrap_or(DEFAULT_TOKEN_EXPIRY_HOURS);

        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&token_expiry_hours) {
            return Err(ConfigError::InvalidTokenExpiry);
        }

        Ok(Self {
            jwt_secret,
            token_expiry_hours,
        })
    }
}

impl UploadConfig {
    /// Load upload configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_mb: usize = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let max_file_size = max_mb
            .checked_mul(1024 * 1024)
            .filter(|size| *size > 0)
            .ok_or(ConfigError::InvalidUploadSize)?;

        Ok(Self {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_file_size,
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_file_size: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    MissingDatabaseUrl,
    EmptyJwtSecret,
    InvalidTokenExpiry,
    InvalidUploadSize,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL environment variable is required")
            }
            ConfigError::EmptyJwtSecret => {
                write!(f, "JWT_SECRET must not be empty when set")
            }
            ConfigError::InvalidTokenExpiry => write!(
                f,
                "JWT_EXPIRY_HOURS must be between 1 and {}",
                MAX_TOKEN_EXPIRY_HOURS
            ),
            ConfigError::InvalidUploadSize => {
                write!(f, "MAX_UPLOAD_SIZE_MB must be a positive size that fits in memory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
