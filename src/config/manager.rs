use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::store::{API_ENDPOINT, CURRENT_TEAM, ConfigStore, MATCH_LOAD_DEFAULT_TO_ORGANIZATION};
use crate::paths;

/// The config file structure.
///
/// Corresponds to `~/.config/vex/config.toml` (or a `.json` file given with
/// `--config`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Team used when a command names none.
    pub current_team: Option<String>,
    /// Whether `match load` loads the whole organization.
    pub match_load_default_to_organization: Option<bool>,
    /// Base URL of the competition-data API.
    pub api_endpoint: Option<String>,
}

impl ConfigFile {
    /// Applies the file's values on top of `store`, validating each one.
    pub fn apply_to(&self, store: &mut ConfigStore) -> Result<()> {
        if let Some(team) = &self.current_team {
            store.set(CURRENT_TEAM, team)?;
        }
        if let Some(flag) = self.match_load_default_to_organization {
            store.set(MATCH_LOAD_DEFAULT_TO_ORGANIZATION, &flag.to_string())?;
        }
        if let Some(endpoint) = &self.api_endpoint {
            store.set(API_ENDPOINT, endpoint)?;
        }
        Ok(())
    }
}

/// Startup overrides that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Team override (`--team`).
    pub team: Option<String>,
}

/// Builds the startup store: built-in defaults, then the config file, then
/// CLI overrides.
pub fn resolve_config(options: &ResolveOptions, file: &ConfigFile) -> Result<ConfigStore> {
    let mut store = ConfigStore::with_defaults();

    file.apply_to(&mut store)
        .context("Invalid value in config file")?;

    if let Some(team) = &options.team {
        store.set(CURRENT_TEAM, team).context("Invalid --team value")?;
    }

    Ok(store)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Loads the configuration file. The file is read-only: nothing is ever
/// written back.
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Uses `$XDG_CONFIG_HOME/vex/config.toml` or `~/.config/vex/config.toml`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::default_config_file()?,
            explicit: false,
        })
    }

    /// Uses a file given on the command line. A missing file is an error.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            explicit: true,
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        parse_config(&contents, FileFormat::from_path(&self.config_path)).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the file, treating a missing default file as empty.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if !self.explicit && !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(ConfigFile::default());
        }

        let file = self.load()?;
        tracing::info!(path = %self.config_path.display(), "loaded config file");
        Ok(file)
    }
}

fn parse_config(contents: &str, format: FileFormat) -> Result<ConfigFile> {
    let file = match format {
        FileFormat::Toml => toml::from_str(contents)?,
        FileFormat::Json => serde_json::from_str(contents)?,
    };
    Ok(file)
}
