//! Configuration - defaults, JSON file, `PAGEPRESENCE_*` environment
//!
//! Precedence (lowest first): defaults → config file → environment → CLI flags.
//! CLI flags are applied by the binary through the `with_*` builders.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::presence::connection::DEFAULT_MAX_RECONNECT_ATTEMPTS;
use crate::presence::fallback::FallbackPolicy;

pub const DEFAULT_REST_BASE: &str = "https://api.lanyard.rest/v1/users";
pub const DEFAULT_SOCKET_URL: &str = "wss://api.lanyard.rest/socket";
pub const CONFIG_FILE_NAME: &str = "pagepresence.json";
pub const ENV_PREFIX: &str = "PAGEPRESENCE_";
/// Shortest fallback period honored; smaller values (including zero) are raised to it.
pub const MIN_FALLBACK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("No subscriber id configured (set PAGEPRESENCE_USER_ID or --user)")]
    MissingUserId,
}

/// Presence client configuration. Higher layers construct or load this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Subscriber whose presence is shown. Not validated beyond non-empty.
    pub user_id: String,
    pub rest_base: String,
    pub socket_url: String,
    pub fetch_timeout_ms: u64,
    pub reconnect_base_ms: u64,
    pub max_reconnect_attempts: u32,
    pub fallback_interval_ms: u64,
    pub fallback: FallbackPolicy,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            rest_base: DEFAULT_REST_BASE.into(),
            socket_url: DEFAULT_SOCKET_URL.into(),
            fetch_timeout_ms: 5_000,
            reconnect_base_ms: 2_000,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            fallback_interval_ms: 60_000,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl PresenceConfig {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), ..Default::default() }
    }
    pub fn with_rest_base(mut self, url: impl Into<String>) -> Self { self.rest_base = url.into(); self }
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self { self.socket_url = url.into(); self }
    pub fn with_fetch_timeout(mut self, d: Duration) -> Self { self.fetch_timeout_ms = millis(d); self }
    pub fn with_reconnect_base(mut self, d: Duration) -> Self { self.reconnect_base_ms = millis(d); self }
    pub fn with_max_reconnect_attempts(mut self, n: u32) -> Self { self.max_reconnect_attempts = n; self }
    pub fn with_fallback_interval(mut self, d: Duration) -> Self { self.fallback_interval_ms = millis(d); self }
    pub fn with_fallback_policy(mut self, p: FallbackPolicy) -> Self { self.fallback = p; self }

    pub fn fetch_timeout(&self) -> Duration { Duration::from_millis(self.fetch_timeout_ms) }
    pub fn reconnect_base(&self) -> Duration { Duration::from_millis(self.reconnect_base_ms) }
    /// Never below [`MIN_FALLBACK_INTERVAL`].
    pub fn fallback_interval(&self) -> Duration {
        Duration::from_millis(self.fallback_interval_ms).max(MIN_FALLBACK_INTERVAL)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_id.trim().is_empty() {
            return Err(ConfigError::MissingUserId);
        }
        if self.fallback_interval_ms == 0 {
            return Err(ConfigError::InvalidValue { key: "fallback_interval_ms".into(), value: "0".into() });
        }
        Ok(())
    }

    /// Read a JSON config file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&data)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
    }

    /// Overlay `PAGEPRESENCE_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from any lookup. Empty values are ignored.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).filter(|v| !v.trim().is_empty()).map(|v| (key, v))
        };

        if let Some((_, v)) = get("USER_ID") { self.user_id = v; }
        if let Some((_, v)) = get("REST_BASE") { self.rest_base = v; }
        if let Some((_, v)) = get("SOCKET_URL") { self.socket_url = v; }
        if let Some((k, v)) = get("FETCH_TIMEOUT_MS") { self.fetch_timeout_ms = parse_num(&k, &v)?; }
        if let Some((k, v)) = get("RECONNECT_BASE_MS") { self.reconnect_base_ms = parse_num(&k, &v)?; }
        if let Some((k, v)) = get("MAX_RECONNECTS") { self.max_reconnect_attempts = parse_num(&k, &v)?; }
        if let Some((k, v)) = get("FALLBACK_INTERVAL_MS") { self.fallback_interval_ms = parse_num(&k, &v)?; }
        Ok(())
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key: key.into(), value: value.into() })
}

/// Config file to use: the explicit path, else `./pagepresence.json`, else
/// `<config dir>/pagepresence/config.json`, whichever exists first.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("pagepresence").join("config.json"))
        .filter(|p| p.exists())
}

/// Defaults, then the config file (if any), then the environment.
pub fn load(explicit: Option<&Path>) -> Result<PresenceConfig, ConfigError> {
    let mut config = match find_config_file(explicit) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            PresenceConfig::from_file(&path)?
        }
        None => PresenceConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

/// Load `KEY=value` lines from a `.env` file into the environment.
/// Variables already set win; comments and blank lines are skipped.
pub fn load_dotenv(path: &Path) -> usize {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return 0,
    };
    let mut loaded = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let (key, value) = (key.trim(), value.trim().trim_matches('"'));
            if !value.is_empty() && std::env::var(key).is_err() {
                std::env::set_var(key, value);
                loaded += 1;
            }
        }
    }
    loaded
}
