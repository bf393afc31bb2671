use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use otr_projection::{ProjectionError, TranslationPolicy};
use serde::{Deserialize, Serialize};

const BUILTIN_CONFIG: &str = include_str!("../assets/default_config.toml");

/// Errors loading the tracker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{path}: {source}")]
    Policy {
        path: PathBuf,
        #[source]
        source: ProjectionError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// File locations and the history display policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding the history log and the snapshot cache.
    pub data_dir: PathBuf,
    /// History log, relative to `data_dir` unless absolute.
    pub history_file: PathBuf,
    /// Previous snapshot, relative to `data_dir` unless absolute.
    pub snapshot_file: PathBuf,
    /// Display policy. Falls back to the built-in one when absent.
    pub policy: Option<TranslationPolicy>,
    /// Extra labels merged into the policy for detailed output.
    pub detail_translations: Option<BTreeMap<String, String>>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_file: PathBuf::from("history.json"),
            snapshot_file: PathBuf::from("snapshot.json"),
            policy: None,
            detail_translations: None,
        }
    }
}

impl TrackerConfig {
    /// Configuration bundled with the binary.
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load `path`, or the built-in configuration when no path is given.
    ///
    /// Policy tables missing from a user file are taken from the built-in
    /// configuration.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let builtin = Self::builtin()?;
        let Some(path) = path else {
            return Ok(builtin);
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        if config.policy.is_none() {
            config.policy = builtin.policy;
        }
        if config.detail_translations.is_none() {
            config.detail_translations = builtin.detail_translations;
        }
        Ok(config)
    }

    /// Replace the display policy with the one in a standalone policy file.
    ///
    /// Detail labels are kept and still merged by [`Self::policy`].
    pub fn override_policy(&mut self, path: &Path) -> ConfigResult<()> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = TranslationPolicy::from_toml_str(&raw).map_err(|source| ConfigError::Policy {
            path: path.to_path_buf(),
            source,
        })?;
        self.policy = Some(policy);
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }

    /// The display policy, with detail labels merged in when `details` is set.
    pub fn policy(&self, details: bool) -> TranslationPolicy {
        let mut policy = self.policy.clone().unwrap_or_default();
        if details {
            if let Some(extra) = &self.detail_translations {
                for (key, label) in extra {
                    policy
                        .translations
                        .entry(key.clone())
                        .or_insert_with(|| label.clone());
                }
            }
        }
        policy
    }
}
