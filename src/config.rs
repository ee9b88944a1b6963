//! Configuration management for the contact book.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is picked up when present; `dotenvy` never writes to stdout, which
//! the MCP transport owns.

use crate::error::{ConfigError, ConfigResult};
use crate::search::{CombineWith, SearchOptions};
use std::env;

/// Configuration for the contact book.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the contact service (serves `/graphql` and `/contacts`)
    pub base_url: String,

    /// CSRF authenticity token sent with state-changing requests
    pub authenticity_token: Option<String>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Fuzzy matching ratio of the query term length (default: 0.2)
    pub search_fuzziness: f64,

    /// Whether query terms match as word prefixes (default: true)
    pub search_prefix: bool,

    /// How multi-term queries are combined (default: or)
    pub search_combine: CombineWith,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `CONTACT_BOOK_URL`: Base URL of the contact service
    ///
    /// Optional environment variables:
    /// - `CONTACT_BOOK_AUTHENTICITY_TOKEN`: CSRF token for POST requests
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `SEARCH_FUZZINESS`: Edit distance ratio, 0.0-1.0 (default: 0.2)
    /// - `SEARCH_PREFIX`: Enable prefix matching (default: true)
    /// - `SEARCH_COMBINE`: `and` or `or` (default: or)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let base_url = env::var("CONTACT_BOOK_URL")
            .map_err(|_| ConfigError::MissingVar("CONTACT_BOOK_URL".to_string()))?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "CONTACT_BOOK_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let authenticity_token = env::var("CONTACT_BOOK_AUTHENTICITY_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let search_fuzziness = Self::parse_env_f64("SEARCH_FUZZINESS", 0.2)?;

        if !(0.0..=1.0).contains(&search_fuzziness) {
            return Err(ConfigError::InvalidValue {
                var: "SEARCH_FUZZINESS".to_string(),
                reason: "Must be between 0.0 and 1.0".to_string(),
            });
        }

        let search_prefix = Self::parse_env_bool("SEARCH_PREFIX", true)?;
        let search_combine = match env::var("SEARCH_COMBINE") {
            Ok(val) => val.parse::<CombineWith>().map_err(|reason| ConfigError::InvalidValue {
                var: "SEARCH_COMBINE".to_string(),
                reason,
            })?,
            Err(_) => CombineWith::Or,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            base_url,
            authenticity_token,
            request_timeout,
            search_fuzziness,
            search_prefix,
            search_combine,
            log_level,
        })
    }

    /// Search options derived from this configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            prefix: self.search_prefix,
            fuzzy: self.search_fuzziness,
            combine_with: self.search_combine,
            ..SearchOptions::default()
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as f64 with a default value.
    fn parse_env_f64(var_name: &str, default: f64) -> ConfigResult<f64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a decimal number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a boolean flag with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: String::new(),
            authenticity_token: None,
            request_timeout: 10,
            search_fuzziness: 0.2,
            search_prefix: true,
            search_combine: CombineWith::Or,
            log_level: "error".to_string(),
        }
    }
}
