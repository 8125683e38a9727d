use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "config.yaml";
const LAYOUT_FILE: &str = "layouts.json";
const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_TITLE_PREFIX: &str = "EVE - ";
pub const DEFAULT_RESTORE_INTERVAL_SECS: u64 = 5;

/// What to do with a layout file that exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Refuse to start and report the file.
    #[default]
    Fail,
    /// Warn and start from an empty store.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub title_prefix: String,
    pub layout_file: Option<PathBuf>,
    pub restore_interval_secs: u64,
    pub on_malformed_layouts: MalformedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title_prefix: DEFAULT_TITLE_PREFIX.into(),
            layout_file: None,
            restore_interval_secs: DEFAULT_RESTORE_INTERVAL_SECS,
            on_malformed_layouts: MalformedPolicy::Fail,
        }
    }
}

impl Config {
    pub fn restore_interval(&self) -> Duration {
        Duration::from_secs(self.restore_interval_secs)
    }

    /// The layout file, falling back to `layouts.json` next to the executable.
    pub fn layout_path(&self) -> PathBuf {
        match &self.layout_file {
            Some(p) => p.clone(),
            None => default_layout_path(),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.title_prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "title_prefix must not be empty".into(),
            ));
        }
        if self.restore_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "restore_interval_secs must be greater than zero".into(),
            ));
        }
        Ok(self)
    }
}

pub fn parse_config(source: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to a map.
    if source.trim().is_empty() {
        return Config::default().validate();
    }
    let config: Config = serde_yaml::from_str(source)?;
    config.validate()
}

/// Loads the config at `path`, or at the default location when `None`.
///
/// An explicit path must exist. A missing default file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::ConfigNotFound(p.to_path_buf()));
            }
            p.to_path_buf()
        }
        None => {
            let p = get_default_config_path();
            if !p.exists() {
                log::debug!("no config at {}, using defaults", p.display());
                return Ok(Config::default());
            }
            p
        }
    };

    let source = fs::read_to_string(&path)?;
    parse_config(&source)
}

pub fn get_default_config_path() -> PathBuf {
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").unwrap_or_default();
            PathBuf::from(home).join(".config")
        });

    xdg_config_home.join(PACKAGE_NAME).join(CONFIG_FILE)
}

fn default_layout_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LAYOUT_FILE)))
        .unwrap_or_else(|| PathBuf::from(LAYOUT_FILE))
}
