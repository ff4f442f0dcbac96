//! # Settings
//!
//! Settings come from three layers, each overriding the previous one:
//!
//! 1. `~/.config/hubcmd/config.toml` (written with defaults on first run),
//! 2. `HUBCMD_*` environment variables,
//! 3. command line flags (applied by the CLI).

use crate::{
    client::{BackendClient, DryRunClient, FixtureClient},
    constants::{DEFAULT_REGION, ENV_BINDING_MODE, ENV_ENDPOINT_URL, ENV_REGION},
    core::{
        context::BindingMode,
        paths::{self, PathError},
    },
    models::ConfirmImpact,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Could not access settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file '{path}' is invalid: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Could not serialize default settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Environment variable {var} has an invalid value '{value}'.")]
    InvalidEnv { var: &'static str, value: String },
    #[error("The 'fixtures' backend needs 'fixtures_dir' to be set.")]
    MissingFixturesDir,
}

/// Which backend collaborator commands are sent to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    DryRun,
    Fixtures,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub region: String,
    /// Overrides the regional endpoint (e.g. a local emulator).
    pub endpoint_url: Option<String>,
    pub binding_mode: BindingMode,
    pub confirm_threshold: ConfirmImpact,
    pub backend: BackendKind,
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            binding_mode: BindingMode::Strict,
            confirm_threshold: ConfirmImpact::Medium,
            backend: BackendKind::DryRun,
            fixtures_dir: None,
        }
    }
}

impl Settings {
    /// Loads the settings file at `path`, writing the defaults there first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if !path.exists() {
            log::debug!("Writing default settings to '{}'", path.display());
            let defaults = Self::default();
            fs::write(path, toml::to_string_pretty(&defaults)?).map_err(io_err)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(path).map_err(io_err)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies `HUBCMD_*` overrides. `lookup` is `std::env::var` in production.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(region) = lookup(ENV_REGION).filter(|r| !r.trim().is_empty()) {
            self.region = region.trim().to_string();
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT_URL).filter(|e| !e.trim().is_empty()) {
            self.endpoint_url = Some(endpoint.trim().to_string());
        }
        if let Some(mode) = lookup(ENV_BINDING_MODE) {
            self.binding_mode = match mode.trim().to_ascii_lowercase().as_str() {
                "strict" => BindingMode::Strict,
                "legacy" => BindingMode::Legacy,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_BINDING_MODE,
                        value: mode,
                    });
                }
            };
        }
        Ok(self)
    }

    /// Builds the backend client these settings describe.
    pub fn build_client(&self) -> Result<Box<dyn BackendClient>, ConfigError> {
        match self.backend {
            BackendKind::DryRun => Ok(Box::new(DryRunClient::new(
                self.region.clone(),
                self.endpoint_url.clone(),
            ))),
            BackendKind::Fixtures => {
                let dir = self
                    .fixtures_dir
                    .clone()
                    .ok_or(ConfigError::MissingFixturesDir)?;
                Ok(Box::new(FixtureClient::new(
                    dir,
                    self.region.clone(),
                    self.endpoint_url.clone(),
                )))
            }
        }
    }
}

/// Loads settings from an explicit file, or the default location when `None`, then
/// applies environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => paths::get_settings_path()?,
    };
    Settings::load_or_create(&path)?.with_env_overrides(|var| std::env::var(var).ok())
}
