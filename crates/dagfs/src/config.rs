//! Adapter configuration.
//!
//! ```yaml
//! timeout: 30s        # per-open deadline, omitted = none
//! chunk_size: 262144  # leaf size used when adding content
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

pub const TIMEOUT_ENV: &str = "DAGFS_TIMEOUT";
pub const CHUNK_SIZE_ENV: &str = "DAGFS_CHUNK_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deadline applied to each `open`, counted from the call.
    pub timeout: Option<Duration>,
    pub chunk_size: usize,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    timeout: Option<String>,
    chunk_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Self::from_raw(RawConfig::default());
        }
        let raw: RawConfig =
            serde_yaml_ng::from_str(text).map_err(|e| Error::config(format!("could not parse yaml: {e}")))?;
        Self::from_raw(raw)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("could not read file {}: {e}", path.display())))?;
        Self::from_yaml(&text)
    }

    /// Defaults overridden by `DAGFS_TIMEOUT` and `DAGFS_CHUNK_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let chunk_size = match get(CHUNK_SIZE_ENV) {
            Some(v) => Some(
                v.trim()
                    .parse::<usize>()
                    .map_err(|e| Error::config(format!("{CHUNK_SIZE_ENV}={v}: {e}")))?,
            ),
            None => None,
        };
        Self::from_raw(RawConfig {
            timeout: get(TIMEOUT_ENV),
            chunk_size,
        })
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let timeout = raw
            .timeout
            .map(|t| parse_duration::parse(&t).map_err(|e| Error::config(format!("timeout {t:?}: {e}"))))
            .transpose()?;
        let chunk_size = raw.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(Error::config("chunk_size must be positive"));
        }
        Ok(Self { timeout, chunk_size })
    }
}
