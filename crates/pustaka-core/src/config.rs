//! Configuration module
//!
//! Runtime settings are read from the process environment (a `.env` file is honoured)
//! into a typed [`Config`], then validated once at startup.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::constants::{
    DEFAULT_PAGE_LENGTH, DEFAULT_UPLOAD_CONTENT_TYPES, DEFAULT_UPLOAD_DIR,
    DEFAULT_UPLOAD_PUBLIC_PREFIX, DEFAULT_UPLOAD_TIMEZONE, MAX_PAGE_LENGTH, MAX_UPLOAD_SIZE_MB,
};
use crate::database_types::DatabaseBackend;

const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DB_PORT: u16 = 5432;
const BYTES_PER_MB: usize = 1024 * 1024;
/// Largest accepted upload ceiling, in megabytes.
const UPLOAD_SIZE_CEILING_MB: usize = 1024;

/// Settings for the cover image upload store.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Flat directory that receives every stored file.
    pub dir: PathBuf,
    /// Public path prefix, always with a leading slash and no trailing slash.
    pub public_prefix: String,
    pub max_size_bytes: usize,
    /// Lower-cased MIME types without parameters.
    pub allowed_content_types: Vec<String>,
    /// Zone whose calendar day prefixes stored filenames.
    pub timezone: Tz,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_prefix: DEFAULT_UPLOAD_PUBLIC_PREFIX.to_string(),
            max_size_bytes: MAX_UPLOAD_SIZE_MB * BYTES_PER_MB,
            allowed_content_types: DEFAULT_UPLOAD_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timezone: chrono_tz::Asia::Jakarta,
        }
    }
}

impl UploadConfig {
    /// Size ceiling rounded down to whole megabytes, used in client messages.
    pub fn max_size_mb(&self) -> usize {
        self.max_size_bytes / BYTES_PER_MB
    }
}

/// Paging policy of the book list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub default_page_length: i64,
    pub max_page_length: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_length: DEFAULT_PAGE_LENGTH,
            max_page_length: MAX_PAGE_LENGTH,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_backend: DatabaseBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub upload: UploadConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary key lookup. Unset or malformed numeric
    /// values fall back to their defaults; malformed enum-like values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let database_backend = match var("DATABASE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => DatabaseBackend::Postgres,
        };

        let database_url = var("DATABASE_URL").unwrap_or_else(|| {
            let host = var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = var("DB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DB_PORT);
            let name = var("DB_NAME").unwrap_or_else(|| "pustaka".to_string());
            let user = var("DB_USER").unwrap_or_else(|| "postgres".to_string());
            match var("DB_PASS") {
                Some(pass) => format!("postgresql://{}:{}@{}:{}/{}", user, pass, host, port, name),
                None => format!("postgresql://{}@{}:{}/{}", user, host, port, name),
            }
        });

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timezone_name =
            var("UPLOAD_TIMEZONE").unwrap_or_else(|| DEFAULT_UPLOAD_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid UPLOAD_TIMEZONE '{}': {}", timezone_name, e))?;

        let max_size_mb: usize = var("UPLOAD_MAX_SIZE_MB")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_size_bytes = max_size_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or_else(|| anyhow::anyhow!("UPLOAD_MAX_SIZE_MB is too large: {}", max_size_mb))?;

        let allowed_content_types = match var("UPLOAD_ALLOWED_CONTENT_TYPES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_UPLOAD_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let upload = UploadConfig {
            dir: PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())),
            public_prefix: normalize_public_prefix(
                &var("UPLOAD_PUBLIC_PREFIX")
                    .unwrap_or_else(|| DEFAULT_UPLOAD_PUBLIC_PREFIX.to_string()),
            ),
            max_size_bytes,
            allowed_content_types,
            timezone,
        };

        let catalog = CatalogConfig {
            default_page_length: var("LIST_DEFAULT_PAGE_LENGTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_PAGE_LENGTH),
            max_page_length: var("LIST_MAX_PAGE_LENGTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_PAGE_LENGTH),
        };

        Ok(Config {
            server_port: var("PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins,
            database_backend,
            database_url,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            upload,
            catalog,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_backend == DatabaseBackend::Postgres
            && !(self.database_url.starts_with("postgresql://")
                || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify allowed origins explicitly"
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }

        if self.upload.max_size_bytes == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_SIZE_MB must be greater than 0"));
        }

        if self.upload.max_size_bytes > UPLOAD_SIZE_CEILING_MB * BYTES_PER_MB {
            return Err(anyhow::anyhow!(
                "UPLOAD_MAX_SIZE_MB cannot exceed {}",
                UPLOAD_SIZE_CEILING_MB
            ));
        }

        if self.upload.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOAD_ALLOWED_CONTENT_TYPES must list at least one MIME type"
            ));
        }

        if self.upload.public_prefix.trim_matches('/').is_empty() {
            return Err(anyhow::anyhow!(
                "UPLOAD_PUBLIC_PREFIX must contain at least one path segment"
            ));
        }

        if self.catalog.default_page_length < 1 || self.catalog.max_page_length < 1 {
            return Err(anyhow::anyhow!(
                "LIST_DEFAULT_PAGE_LENGTH and LIST_MAX_PAGE_LENGTH must be positive"
            ));
        }

        if self.catalog.default_page_length > self.catalog.max_page_length {
            return Err(anyhow::anyhow!(
                "LIST_DEFAULT_PAGE_LENGTH cannot exceed LIST_MAX_PAGE_LENGTH"
            ));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }
}

fn normalize_public_prefix(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_backend, DatabaseBackend::Postgres);
        assert_eq!(
            config.database_url,
            "postgresql://postgres@localhost:5432/pustaka"
        );
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.upload.max_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.upload.public_prefix, "/uploads");
        assert_eq!(config.upload.timezone, chrono_tz::Asia::Jakarta);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn database_url_is_assembled_from_parts() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "perpus"),
            ("DB_USER", "admin"),
            ("DB_PASS", "rahasia"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgresql://admin:rahasia@db:6543/perpus");
    }

    #[test]
    fn explicit_database_url_wins() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u@h/d"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://u@h/d");
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = config_from(&[("PORT", "abc"), ("UPLOAD_MAX_SIZE_MB", "-1")]).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.upload.max_size_mb(), 5);
    }

    #[test]
    fn absurd_upload_ceiling_is_rejected() {
        let overflowing = usize::MAX.to_string();
        assert!(config_from(&[("UPLOAD_MAX_SIZE_MB", overflowing.as_str())]).is_err());

        let config = config_from(&[
            ("DATABASE_BACKEND", "memory"),
            ("UPLOAD_MAX_SIZE_MB", "2048"),
        ])
        .unwrap();
        assert_eq!(config.upload.max_size_mb(), 2048);
        assert!(config.validate().is_err());
    }

    #[test]
    fn public_prefix_is_normalized() {
        let config = config_from(&[("UPLOAD_PUBLIC_PREFIX", "covers/")]).unwrap();
        assert_eq!(config.upload.public_prefix, "/covers");
    }

    #[test]
    fn invalid_timezone_is_rejected() {
        assert!(config_from(&[("UPLOAD_TIMEZONE", "Mars/Olympus")]).is_err());
    }

    #[test]
    fn invalid_backend_is_rejected() {
        assert!(config_from(&[("DATABASE_BACKEND", "mysql")]).is_err());
    }

    #[test]
    fn memory_backend_skips_url_validation() {
        let config = config_from(&[
            ("DATABASE_BACKEND", "memory"),
            ("DATABASE_URL", "not-a-url"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn wildcard_cors_rejected_in_production() {
        let config = config_from(&[("APP_ENV", "production")]).unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://admin.example.com"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn page_length_policy_is_checked() {
        let config = config_from(&[
            ("LIST_DEFAULT_PAGE_LENGTH", "50"),
            ("LIST_MAX_PAGE_LENGTH", "20"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn content_types_are_lowercased() {
        let config =
            config_from(&[("UPLOAD_ALLOWED_CONTENT_TYPES", "IMAGE/PNG, image/gif ,")]).unwrap();
        assert_eq!(
            config.upload.allowed_content_types,
            vec!["image/png".to_string(), "image/gif".to_string()]
        );
    }
}
