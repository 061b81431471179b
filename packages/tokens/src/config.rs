use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::controller::ActionErrorPolicy;

pub const DEFAULT_API_URL: &str = "https://flathub.org/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Unsupported URL scheme: {0} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(#[from] ParseIntError),
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
    #[error("Invalid boolean for {name}: {value}")]
    InvalidBool { name: &'static str, value: String },
}

/// Connection settings for the HTTP gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Settings shared by the CLI and TUI
#[derive(Debug, Clone)]
pub struct VendingConfig {
    pub gateway: GatewayConfig,
    pub action_errors: ActionErrorPolicy,
    pub log_file: Option<PathBuf>,
}

impl VendingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse settings from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("VENDING_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = parse_api_url(&api_url)?;

        let api_token = lookup("VENDING_API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let timeout_secs = match lookup("VENDING_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>()?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let surface = match lookup("VENDING_SURFACE_ACTION_ERRORS") {
            Some(value) => parse_bool("VENDING_SURFACE_ACTION_ERRORS", &value)?,
            None => false,
        };
        let action_errors = if surface {
            ActionErrorPolicy::Surface
        } else {
            ActionErrorPolicy::Silent
        };

        let log_file = lookup("VENDING_LOG_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            gateway: GatewayConfig {
                api_url,
                api_token,
                timeout: Duration::from_secs(timeout_secs),
            },
            action_errors,
            log_file,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}
