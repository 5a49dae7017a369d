use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{FinPlanError, Result},
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

pub const DEFAULT_CURRENCY: &str = "INR";

/// User preferences persisted next to the data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.into()
}

fn default_locale() -> String {
    "en-IN".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            locale: default_locale(),
            data_file: None,
        }
    }
}

impl Config {
    /// Normalizes and stores a currency code. Codes are 3 ASCII letters.
    pub fn set_default_currency(&mut self, code: &str) -> Result<()> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FinPlanError::Config(format!(
                "`{}` is not a three-letter currency code",
                code
            )));
        }
        self.default_currency = normalized;
        Ok(())
    }
}

/// Loads and saves [`Config`] under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            FinPlanError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    /// Store file named by the config, or the default location in the data directory.
    pub fn store_path(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => PathResolver::store_file_in(&self.base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}
