//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const SESSION_DIR_NAME: &str = ".taskdesk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without the versioned API prefix.
    pub api_url: String,
    pub timeouts: Timeouts,
    /// Directory holding the persisted token and user record.
    pub session_dir: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `TASKDESK_API_URL`: default `http://localhost:8000`
    /// - `TASKDESK_REQUEST_TIMEOUT_SECS`: default 10
    /// - `TASKDESK_CONNECT_TIMEOUT_SECS`: default 5
    /// - `TASKDESK_SESSION_DIR`: default `~/.taskdesk`
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads from an arbitrary lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(lookup, dirs::home_dir)
    }

    fn resolve<F, H>(lookup: F, home_dir: H) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
        H: FnOnce() -> Option<PathBuf>,
    {
        let api_url = lookup("TASKDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = normalize_api_url(&api_url)?;
        let timeouts = Timeouts {
            request_secs: parse_secs(&lookup, "TASKDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(&lookup, "TASKDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let session_dir = match lookup("TASKDESK_SESSION_DIR").filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir()
                .map(|home| home.join(SESSION_DIR_NAME))
                .ok_or_else(|| {
                    ApiError::Config("could not determine home directory; set TASKDESK_SESSION_DIR".to_owned())
                })?,
        };

        Ok(Self { api_url, timeouts, session_dir })
    }

    /// Config pointing at `api_url` with default timeouts.
    pub fn for_api_url(api_url: &str, session_dir: impl Into<PathBuf>) -> Result<Self, ApiError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            session_dir: session_dir.into(),
        })
    }

    /// Versioned base URL every resource path is appended to.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}{API_PREFIX}", self.api_url)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!("TASKDESK_API_URL must be an http(s) URL, got '{raw}'")));
    }
    Ok(trimmed.to_owned())
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ApiError::Config(format!("{key} must be a positive integer, got '{raw}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
