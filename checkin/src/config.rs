//! Configuration management for the check-in client.
//!
//! Loads configuration from environment variables with defaults. The binary
//! loads a `.env` file first, so the same variables can live there.

use crate::normalize::DEFAULT_SCAN_PREFIX;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the remote service
pub const DEFAULT_API_URL: &str = "https://0477backend-production.up.railway.app/api";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote service configuration
    pub api: ApiConfig,
    /// Scanner configuration
    pub scanner: ScannerConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without trailing endpoint path
    pub base_url: String,
    /// Per-request timeout in seconds; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Whether the paid-list endpoints are used
    pub list_entries: bool,
}

impl ApiConfig {
    /// The request timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Prefix stripped from scanned payloads
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                request_timeout_secs: None,
                list_entries: false,
            },
            scanner: ScannerConfig {
                prefix: DEFAULT_SCAN_PREFIX.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a malformed value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            api: ApiConfig {
                base_url: lookup("CHECKIN_API_URL")
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or(defaults.api.base_url),
                request_timeout_secs: lookup("CHECKIN_REQUEST_TIMEOUT_SECS")
                    .map(|raw| parse_timeout("CHECKIN_REQUEST_TIMEOUT_SECS", raw))
                    .transpose()?,
                list_entries: lookup("CHECKIN_LIST_ENTRIES")
                    .map(|raw| parse_bool("CHECKIN_LIST_ENTRIES", raw))
                    .transpose()?
                    .unwrap_or(defaults.api.list_entries),
            },
            scanner: ScannerConfig {
                prefix: lookup("CHECKIN_SCAN_PREFIX").unwrap_or(defaults.scanner.prefix),
            },
        })
    }
}

fn parse_bool(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected true or false",
        }),
    }
}

fn parse_timeout(key: &'static str, raw: String) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a positive number of seconds",
        }),
    }
}
