//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! println!("RPC endpoint: {}", config.rpc_endpoint);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Example |
//! |----------|-------------|---------|
//! | `CHAINSTACK_ENDPOINT` | Solana RPC endpoint | `https://solana-mainnet.core.chainstack.com/...` |
//! | `SERVER_HOST` | HTTP server host | `127.0.0.1` |
//! | `SERVER_PORT` | HTTP server port | `8080` |

use std::env;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// Application configuration loaded from environment variables.
///
/// The action handlers are stateless; the only thing they need from the
/// environment is the RPC endpoint every request connects to.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Solana RPC endpoint URL.
    ///
    /// A fresh client is connected to this endpoint for every
    /// transaction request.
    pub rpc_endpoint: String,

    /// HTTP server host address.
    ///
    /// Use `127.0.0.1` for localhost only, `0.0.0.0` to accept
    /// connections from any interface.
    pub server_host: String,

    /// HTTP server port number.
    ///
    /// Default: 8080
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    ///
    /// ## Returns
    ///
    /// - `Ok(AppConfig)` - Configuration loaded successfully
    /// - `Err(ConfigError)` - A required variable is missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_endpoint = get_env("CHAINSTACK_ENDPOINT")?;
        let server_host = get_env_or_default("SERVER_HOST", "127.0.0.1");
        let server_port = parse_port(&get_env_or_default("SERVER_PORT", "8080"))?;

        Ok(Self {
            rpc_endpoint,
            server_host,
            server_port,
        })
    }
}

/// Get a required environment variable.
///
/// Empty values count as missing.
fn get_env(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::ParseError("SERVER_PORT".to_string(), format!("{}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_or_default() {
        // Should return default when not set
        let value = get_env_or_default("NONEXISTENT_VAR_12345", "default_value");
        assert_eq!(value, "default_value");
    }

    #[test]
    fn test_get_env_missing() {
        let err = get_env("NONEXISTENT_VAR_67890").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "NONEXISTENT_VAR_67890"));
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert!(matches!(parse_port("not-a-port"), Err(ConfigError::ParseError(..))));
        assert!(parse_port("70000").is_err());
    }
}
