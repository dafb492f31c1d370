//! Unit tests for configuration parsing
//!
//! Tests environment variable parsing and default values.
//!
//! Note: These tests modify global environment variables and must run serially.

use bugtrack::config::{AuthConfig, Config, ConfigError, UploadConfig};
use serial_test::serial;
use std::path::PathBuf;

const ENV_VARS: [&str; 7] = [
    "PORT",
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRY_HOURS",
    "UPLOAD_DIR",
    "MAX_UPLOAD_SIZE_MB",
    "SEED_DEMO_DATA",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

// =============================================================================
// Server Config Tests
// =============================================================================

#[test]
#[serial]
fn test_config_defaults() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/bugtrack");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 5000);
    assert!(config.seed_demo_data);
    assert!(config.auth.jwt_secret.is_none());
    assert_eq!(config.auth.token_expiry_hours, 24);
    assert_eq!(config.uploads.dir, PathBuf::from("./uploads"));
    assert_eq!(config.uploads.max_file_size, 10 * 1024 * 1024);

    clear_env();
}

#[test]
#[serial]
fn test_config_requires_database_url() {
    clear_env();

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::MissingDatabaseUrl)
    ));
}

#[test]
#[serial]
fn test_config_invalid_port() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/bugtrack");
    std::env::set_var("PORT", "fifty");

    assert!(matches!(Config::from_env(), Err(ConfigError::InvalidPort)));

    clear_env();
}

#[test]
#[serial]
fn test_seed_can_be_disabled() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/bugtrack");
    std::env::set_var("SEED_DEMO_DATA", "false");

    let config = Config::from_env().unwrap();
    assert!(!config.seed_demo_data);

    clear_env();
}

// =============================================================================
// Auth Config Tests
// =============================================================================

#[test]
#[serial]
fn test_auth_config_custom_values() {
    clear_env();
    std::env::set_var("JWT_SECRET", "super-secret");
    std::env::set_var("JWT_EXPIRY_HOURS", "2");

    let config = AuthConfig::from_env().unwrap();
    assert_eq!(config.jwt_secret.as_deref(), Some("super-secret"));
    assert_eq!(config.token_expiry_hours, 2);

    clear_env();
}

#[test]
#[serial]
fn test_auth_config_rejects_out_of_range_expiry() {
    for hours in ["0", "-3", "9223372036854775807"] {
        clear_env();
        std::env::set_var("JWT_EXPIRY_HOURS", hours);

        assert!(
            matches!(AuthConfig::from_env(), Err(ConfigError::InvalidTokenExpiry)),
            "JWT_EXPIRY_HOURS={} should be rejected",
            hours
        );
    }

    clear_env();
}

#[test]
#[serial]
fn test_auth_config_rejects_empty_secret() {
    clear_env();
    std::env::set_var("JWT_SECRET", "");

    assert!(matches!(
        AuthConfig::from_env(),
        Err(ConfigError::EmptyJwtSecret)
    ));

    clear_env();
}

// =============================================================================
// Upload Config Tests
// =============================================================================

#[test]
#[serial]
fn test_upload_config_custom_values() {
    clear_env();
    std::env::set_var("UPLOAD_DIR", "/var/lib/bugtrack/uploads");
    std::env::set_var("MAX_UPLOAD_SIZE_MB", "2");

    let config = UploadConfig::from_env().unwrap();
    assert_eq!(config.dir, PathBuf::from("/var/lib/bugtrack/uploads"));
    assert_eq!(config.max_file_size, 2 * 1024 * 1024);

    clear_env();
}

#[test]
#[serial]
fn test_upload_config_invalid_size_uses_default() {
    clear_env();
    std::env::set_var("MAX_UPLOAD_SIZE_MB", "lots");

    let config = UploadConfig::from_env().unwrap();
    assert_eq!(config.max_file_size, 10 * 1024 * 1024);

    clear_env();
}

#[test]
#[serial]
fn test_upload_config_rejects_overflowing_size() {
    clear_env();
    std::env::set_var("MAX_UPLOAD_SIZE_MB", usize::MAX.to_string());

    assert!(matches!(
        UploadConfig::from_env(),
        Err(ConfigError::InvalidUploadSize)
    ));

    std::env::set_var("MAX_UPLOAD_SIZE_MB", "0");
    assert!(matches!(
        UploadConfig::from_env(),
        Err(ConfigError::InvalidUploadSize)
    ));

    clear_env();
}
