//! Application context: the state shared by the REPL and its command handlers.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::{
    API_ENDPOINT, ConfigError, ConfigManager, ConfigStore, DEFAULT_API_ENDPOINT, ResolveOptions,
    resolve_config, validate,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Options for building the context at startup.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Explicit config file (`--config`).
    pub config_path: Option<PathBuf>,
    /// Team override (`--team`).
    pub team: Option<String>,
}

/// Owns the config store and the API client session.
pub struct AppContext {
    config: ConfigStore,
    api: ApiClient,
    config_path: Option<PathBuf>,
}

impl AppContext {
    /// Creates a context around an already-resolved store.
    pub fn new(config: ConfigStore) -> Result<Self, AppError> {
        let api = ApiClient::new(config.api_endpoint())?;
        Ok(Self {
            config,
            api,
            config_path: None,
        })
    }

    /// Loads the config file, applies CLI overrides, and opens the API session.
    pub fn init(options: &StartupOptions) -> Result<Self> {
        let manager = match &options.config_path {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new()?,
        };

        let file = manager.load_or_default()?;
        let resolve = ResolveOptions {
            team: options.team.clone(),
        };
        let config = resolve_config(&resolve, &file)?;

        let mut app = Self::new(config).context("Failed to create API client")?;
        app.config_path = Some(manager.config_path().clone());

        tracing::debug!(
            team = app.config.current_team().unwrap_or("-"),
            api = %app.api.base_url(),
            "application context ready"
        );
        Ok(app)
    }

    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub const fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Sets a config value, keeping the API session in sync with `api_endpoint`.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<Option<String>, AppError> {
        let value = validate(key, value)?;
        if key == API_ENDPOINT {
            self.api.set_base_url(&value)?;
        }
        Ok(self.config.set(key, &value)?)
    }

    pub fn unset_config(&mut self, key: &str) -> Result<Option<String>, AppError> {
        let previous = self.config.unset(key)?;
        if key == API_ENDPOINT {
            self.api.set_base_url(DEFAULT_API_ENDPOINT)?;
        }
        Ok(previous)
    }

    /// Releases the context at process stop.
    pub fn shutdown(self) {
        tracing::debug!("application context shut down");
    }
}
