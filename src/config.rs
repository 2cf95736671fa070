// Runtime configuration. Everything comes from environment variables (an
// optional `.env` in the working directory is loaded first).

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend origin, without trailing slash. `/health` lives directly under it.
    pub api_url: String,
    /// Path prefix of the analysis routes, e.g. `/api`.
    pub api_prefix: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_prefix: DEFAULT_API_PREFIX.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read `RESUMEN_API_URL`, `RESUMEN_API_PREFIX` and `RESUMEN_TIMEOUT_SECS`,
    /// falling back to the defaults above for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(
            std::env::var("RESUMEN_API_URL").ok(),
            std::env::var("RESUMEN_API_PREFIX").ok(),
            std::env::var("RESUMEN_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(
        api_url: Option<String>,
        api_prefix: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.into());
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ConfigError::Invalid {
                var: "RESUMEN_API_URL",
                message: "must not be empty".into(),
            });
        }

        let api_prefix = normalize_prefix(&api_prefix.unwrap_or_else(|| DEFAULT_API_PREFIX.into()));

        let timeout = match timeout_secs {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "RESUMEN_TIMEOUT_SECS",
                    message: format!("{}: {}", raw, e),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "RESUMEN_TIMEOUT_SECS",
                        message: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
        };

        Ok(Config { api_url, api_prefix, timeout })
    }

    /// Full URL of an analysis route, e.g. `api_endpoint("/analyze/text")`.
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.api_url, self.api_prefix, path)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_url)
    }
}

// "" and "/" mean no prefix; otherwise exactly one leading slash, none trailing.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
