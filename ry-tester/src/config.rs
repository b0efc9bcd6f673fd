//! Configuration management
//!
//! Sources, later ones win: built-in defaults, a TOML file, then the
//! `RYTEST_*` environment variables. Command-line flags are applied on top by
//! the caller.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TesterError};
use crate::filter::TestFilter;
use crate::store::DEFAULT_NAME_PREFIX;

pub const FILTER_VAR: &str = "RYTEST_FILTER";
pub const DISABLED_VAR: &str = "RYTEST_DISABLED_TESTS";
pub const COLOR_VAR: &str = "RYTEST_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(TesterError::config(format!("unknown color mode '{}'", other))),
        }
    }

    /// Install this mode as the process-wide `colored` override
    pub fn apply(self) {
        match self {
            ColorMode::Auto => colored::control::unset_override(),
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TesterConfig {
    /// Console coloring
    #[serde(default)]
    pub color: ColorMode,

    /// Wildcard pattern a case's full name must match to run
    #[serde(default)]
    pub filter: Option<String>,

    /// Full case names that never run
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Prefix for generated item names
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            filter: None,
            disabled: Vec::new(),
            name_prefix: default_name_prefix(),
        }
    }
}

impl TesterConfig {
    /// Load from `config_path`, or the per-user default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_owned(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            TesterError::io(format!("failed to read {}: {}", config_path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay the `RYTEST_*` environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup; unset or empty values are
    /// ignored
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(filter) = lookup(FILTER_VAR) {
            self.filter = Some(filter);
        }
        if let Some(disabled) = lookup(DISABLED_VAR) {
            self.disabled.extend(split_names(&disabled));
        }
        if let Some(color) = lookup(COLOR_VAR) {
            self.color = ColorMode::parse(&color)?;
        }

        Ok(self)
    }

    pub fn filter(&self) -> Result<TestFilter> {
        TestFilter::new(self.filter.as_deref(), self.disabled.iter().cloned())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TesterError::config("cannot determine config directory"))?;

        Ok(config_dir.join("rytest").join("config.toml"))
    }
}

/// Comma separated case names; blanks are dropped
pub(crate) fn split_names(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}
