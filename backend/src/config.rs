//! Process configuration for the facts service.
//!
//! Read once at startup and passed into the HTTP state; nothing in the
//! crate reads these environment variables after that.
//!
//! # Environment Variables
//!
//! - `APP_NAME`: Service name shown in logs and the API docs
//! - `APP_DESCRIPTION`: Description shown in the API docs
//! - `APP_DEBUG`: `true`/`1` enables debug logging (default: false)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)

use std::env;
use std::net::SocketAddr;

pub const DEFAULT_APP_NAME: &str = "Chuck Norris Facts API";
pub const DEFAULT_APP_DESCRIPTION: &str =
    "Create, read, update and delete Chuck Norris facts.";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            description: DEFAULT_APP_DESCRIPTION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    /// Returns an error if `PORT` or `APP_DEBUG` is set but unparsable.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => defaults.port,
        };

        let debug = match env::var("APP_DEBUG") {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| format!("APP_DEBUG must be a boolean, got '{}'", raw))?,
            Err(_) => defaults.debug,
        };

        Ok(Self {
            name: env::var("APP_NAME").unwrap_or(defaults.name),
            description: env::var("APP_DESCRIPTION").unwrap_or(defaults.description),
            version: defaults.version,
            debug,
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
        })
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
