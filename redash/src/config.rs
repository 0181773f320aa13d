//! Configuration resolution with layered precedence
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (service URL only)
//! 2. Global config: `$XDG_CONFIG_HOME/redashpy/redashpy.toml`
//! 3. Environment variables: `REDASH_SERVICE_URL`, `REDASH_API_KEY`
//! 4. Explicit command line flags
//!
//! Resolution happens once, before the client is constructed.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;

/// Service URL used when nothing else provides one.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";

/// Prefix of the environment variables read during resolution.
pub const ENV_PREFIX: &str = "REDASH";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub service_url: Option<String>,
    pub api_key: Option<String>,
}

/// Raw settings for intermediate parsing (every layer may leave fields out).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub service_url: Option<String>,
    pub api_key: Option<String>,
}

impl RawSettings {
    /// Overlay wins if it provides a non-empty value.
    fn merge_with(self, overlay: RawSettings) -> Self {
        Self {
            service_url: non_empty(overlay.service_url).or(self.service_url),
            api_key: non_empty(overlay.api_key).or(self.api_key),
        }
    }
}

/// Resolved connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the Redash service, without trailing slash
    pub service_url: String,
    /// API key sent as `Authorization: Key <api_key>`
    pub api_key: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("service_url", &self.service_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Get the XDG config directory for redashpy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "redashpy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("redashpy.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Read `REDASH_*` variables through the config crate.
///
/// `source` replaces the process environment when given.
fn load_env_settings(source: Option<HashMap<String, String>>) -> ApplicationResult<RawSettings> {
    let config = Config::builder()
        .add_source(Environment::with_prefix(ENV_PREFIX).source(source))
        .build()
        .map_err(config_err)?;

    Ok(RawSettings {
        service_url: config.get_string("service_url").ok(),
        api_key: config.get_string("api_key").ok(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expand `$VAR` and `${VAR}`; unknown variables are left as written.
///
/// Variables come from `env` when given, otherwise from the process.
fn expand_env_vars(value: &str, env: Option<&HashMap<String, String>>) -> String {
    shellexpand::env_with_context_no_errors(value, |name| match env {
        Some(vars) => vars.get(name).cloned(),
        None => std::env::var(name).ok(),
    })
    .into_owned()
}

impl Settings {
    /// Resolve settings from all layers using the process environment.
    pub fn load(overrides: &Overrides) -> ApplicationResult<Self> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), None, overrides)
    }

    /// Resolve settings from an explicit config file and environment map.
    ///
    /// `env` of `None` reads the process environment.
    pub fn load_from(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
        overrides: &Overrides,
    ) -> ApplicationResult<Self> {
        // 1. Defaults
        let mut current = RawSettings {
            service_url: Some(DEFAULT_SERVICE_URL.to_string()),
            api_key: None,
        };

        // 2. Global config file
        if let Some(path) = config_file {
            current = current.merge_with(load_raw_settings(path)?);
        }

        // 3. Environment
        current = current.merge_with(load_env_settings(env.clone())?);

        // 4. Command line
        current = current.merge_with(RawSettings {
            service_url: overrides.service_url.clone(),
            api_key: overrides.api_key.clone(),
        });

        Self::from_raw(current, env.as_ref())
    }

    fn from_raw(
        raw: RawSettings,
        env: Option<&HashMap<String, String>>,
    ) -> ApplicationResult<Self> {
        let service_url = raw
            .service_url
            .map(|url| {
                expand_env_vars(url.trim(), env)
                    .trim_end_matches('/')
                    .to_string()
            })
            .filter(|url| !url.is_empty())
            .ok_or(DomainError::MissingParameter("service_url"))?;
        let api_key = raw
            .api_key
            .ok_or(DomainError::MissingParameter("api_key"))?;

        Ok(Self {
            service_url,
            api_key,
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
