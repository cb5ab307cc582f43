// Server configuration
//
// Everything is read from the environment; unset values fall back to defaults
// that run the built-in catalog on port 5000.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON catalog replacing the built-in seed books
    pub catalog_path: Option<PathBuf>,
    /// Empty means same-origin only
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            catalog_path: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load from environment variables
    ///
    /// - BIND_ADDR: listen address (default: 0.0.0.0:5000)
    /// - CATALOG_PATH: optional catalog JSON file
    /// - CORS_ALLOWED_ORIGINS: comma-separated origins
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = match std::env::var("BIND_ADDR").ok().filter(|s| !s.is_empty()) {
            Some(addr) => addr
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDR '{}': {}", addr, e))?,
            None => default_bind_addr(),
        };

        let catalog_path = std::env::var("CATALOG_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            catalog_path,
            cors_allowed_origins,
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

/// Split a comma-separated origin list, dropping entries that are not valid header values
pub fn parse_origins(value: &str) -> Vec<HeaderValue> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
