//! Publication settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Settings for the publication step.
///
/// Resolution order: defaults, then an optional TOML file, then
/// `LREG_NAMESPACE` / `LREG_NETWORK` / `LREG_CACHE_PATH` /
/// `LREG_MAX_ATTEMPTS` / `LREG_RETRY_DELAY_MS` from the environment. Command-line flags are applied
/// on top by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Key prefix in the cache.
    pub namespace: String,
    /// Network label recorded in the provenance record.
    pub network: String,
    /// JSON cache file. `None` means no cache is configured.
    pub cache_path: Option<PathBuf>,
    /// Attempts per cache write before falling back.
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            namespace: "blockchain".into(),
            network: "localhost".into(),
            cache_path: None,
            max_attempts: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PublishConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, PublishError> {
        let config: Self = toml::from_str(s).map_err(|e| PublishError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, PublishError> {
        let base = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    PublishError::ConfigRead {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `LREG_*` overrides from `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, PublishError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ns) = lookup("LREG_NAMESPACE") {
            self.namespace = ns;
        }
        if let Some(network) = lookup("LREG_NETWORK") {
            self.network = network;
        }
        if let Some(path) = lookup("LREG_CACHE_PATH") {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(attempts) = lookup("LREG_MAX_ATTEMPTS") {
            self.max_attempts = attempts
                .parse()
                .map_err(|_| PublishError::Config(format!("LREG_MAX_ATTEMPTS: {attempts:?}")))?;
        }
        if let Some(delay) = lookup("LREG_RETRY_DELAY_MS") {
            self.retry_delay_ms = delay
                .parse()
                .map_err(|_| PublishError::Config(format!("LREG_RETRY_DELAY_MS: {delay:?}")))?;
        }
        self.validate()
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn validate(self) -> Result<Self, PublishError> {
        if self.namespace.trim().is_empty() {
            return Err(PublishError::Config("namespace must not be empty".into()));
        }
        if self.max_attempts == 0 {
            return Err(PublishError::Config("max_attempts must be at least 1".into()));
        }
        Ok(self)
    }
}
