// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the route catalog is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    Memory,
    File,
    Firestore,
}

impl FromStr for CatalogBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CatalogBackend::Memory),
            "file" => Ok(CatalogBackend::File),
            "firestore" => Ok(CatalogBackend::Firestore),
            _ => Err(ConfigError::Invalid {
                var: "CATALOG_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// HS256 key shared with the auth provider (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub catalog_backend: CatalogBackend,
    /// Snapshot path for the file backend
    pub catalog_path: PathBuf,
    /// GCP project for the Firestore backend
    pub gcp_project_id: String,
    /// Expose `POST /api/catalog/reset`
    pub allow_catalog_reset: bool,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let catalog_backend = match env::var("CATALOG_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => CatalogBackend::File,
        };

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?;
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Missing("JWT_SIGNING_KEY"));
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key: jwt_signing_key.into_bytes(),
            catalog_backend,
            catalog_path: env::var("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/routes.json")),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            allow_catalog_reset: env::var("ALLOW_CATALOG_RESET")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// Configuration for tests: in-memory catalog, reset enabled.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            catalog_backend: CatalogBackend::Memory,
            catalog_path: PathBuf::from("data/routes.json"),
            gcp_project_id: "test-project".to_string(),
            allow_catalog_reset: true,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
