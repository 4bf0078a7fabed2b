//! Server configuration.

use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Which origins may call the HTTP API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    Any,
    Exact(HeaderValue),
}

impl CorsOrigin {
    /// `*` allows any origin; anything else must be a valid header value.
    pub fn parse(origin: &str) -> Result<Self, ConfigError> {
        if origin == "*" {
            return Ok(Self::Any);
        }
        HeaderValue::from_str(origin)
            .map(Self::Exact)
            .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: CorsOrigin,
}

impl ServerConfig {
    pub fn new(host: String, port: u16, cors_origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            host,
            port,
            cors_origin: CorsOrigin::parse(cors_origin)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]);
        match &self.cors_origin {
            CorsOrigin::Any => layer.allow_origin(Any),
            CorsOrigin::Exact(origin) => layer.allow_origin(origin.clone()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origin: CorsOrigin::Any,
        }
    }
}
