//! API server configuration.
//!
//! Read once from the environment at startup and injected everywhere;
//! business logic never reads env vars directly.

use std::path::PathBuf;

use acervo_core::auth::token::{DEFAULT_TOKEN_TTL_SECS, resolve_jwt_secret};
use acervo_core::storage::{DEFAULT_MAX_FILE_SIZE, StorageConfig};

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:3001").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Root directory of the upload tree.
    pub upload_dir: PathBuf,
    /// Base URL the site is served from, used to build public file URLs.
    pub public_base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: u64,
    /// Origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    /// Deployment environment label, reported by the health endpoint.
    pub environment: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable          | Default                              |
    /// |-------------------|--------------------------------------|
    /// | `BIND_ADDR`       | `0.0.0.0:3001`                       |
    /// | `DATABASE_URL`    | `postgres://localhost:5432/acervo`   |
    /// | `JWT_SECRET`      | generated & persisted to file        |
    /// | `TOKEN_TTL_SECS`  | `180`                                |
    /// | `UPLOAD_DIR`      | `./uploads`                          |
    /// | `PUBLIC_BASE_URL` | `http://localhost:3001`              |
    /// | `MAX_FILE_SIZE`   | `10485760`                           |
    /// | `CORS_ORIGIN`     | `http://localhost:4321` (comma list) |
    /// | `APP_ENV`         | `development`                        |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/acervo".into()),
            jwt_secret: resolve_jwt_secret(),
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            max_file_size: std::env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_SIZE),
            cors_origins: std::env::var("CORS_ORIGIN")
                .map(|v| v.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["http://localhost:4321".into()]),
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Storage engine configuration derived from this config.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            root: self.upload_dir.clone(),
            max_file_size: self.max_file_size,
            public_base_url: self.public_base_url.clone(),
        }
    }
}
