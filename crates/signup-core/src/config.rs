use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1200;
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignupConfig {
    pub version: u32,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            version: 1,
            submission: SubmissionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            timeout_ms: DEFAULT_SUBMIT_TIMEOUT_MS,
        }
    }
}

impl SubmissionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_SUBMIT_DELAY_MS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_SUBMIT_TIMEOUT_MS
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("signup")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<SignupConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: SignupConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Loads the config at `path`, falling back to defaults when no file exists.
pub fn load_config_or_default(path: &Path) -> Result<SignupConfig, ConfigError> {
    if !path.exists() {
        return Ok(SignupConfig::default());
    }
    load_config(path)
}

pub fn validate_config(config: &SignupConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    let submission = &config.submission;
    if submission.timeout_ms == 0 {
        return Err(ConfigError::Validation {
            message: "submission.timeout_ms must be greater than 0".to_string(),
        });
    }

    if submission.timeout_ms <= submission.delay_ms {
        return Err(ConfigError::Validation {
            message: format!(
                "submission.timeout_ms ({}) must exceed submission.delay_ms ({})",
                submission.timeout_ms, submission.delay_ms
            ),
        });
    }

    Ok(())
}
