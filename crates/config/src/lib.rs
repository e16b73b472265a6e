//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults ([`Settings::default`]).
//! 2. A TOML file: the one passed explicitly, otherwise
//!    [`default_config_file`] if it exists.
//! 3. Environment variables prefixed `FKM_`, with `__` separating nested
//!    keys (e.g. `FKM_REMOTE__TIMEOUT_SECS=10`).
//! 4. Command-line [`Overrides`].

pub mod error;
mod path;

pub use crate::path::{default_config_file, expand_home};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use fkm_remote::HttpOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where Keymapp keeps its database on Linux.
pub const DEFAULT_DATABASE: &str = "~/.config/.keymapp/keymapp.sqlite3";
const ENV_PREFIX: &str = "FKM_";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the Keymapp database. A leading `~` is expanded by
    /// [`database_path`](Self::database_path).
    pub database: PathBuf,
    /// Create the database's parent directories if they're missing.
    pub mkdir: bool,
    pub remote: RemoteConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            mkdir: true,
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub query_endpoint: String,
    pub metadata_endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let options = HttpOptions::default();
        Self {
            query_endpoint: options.query_endpoint,
            metadata_endpoint: options.metadata_endpoint,
            user_agent: options.user_agent,
            timeout_secs: options.timeout.as_secs(),
        }
    }
}

impl From<&RemoteConfig> for HttpOptions {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            query_endpoint: config.query_endpoint.clone(),
            metadata_endpoint: config.metadata_endpoint.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Values given on the command line. `None` means "not given", leaving the
/// value from lower-priority sources in place.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mkdir: Option<bool>,
}

impl Settings {
    /// Load settings from every source.
    ///
    /// An explicitly given `file` must exist; the default config file is
    /// optional.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        match file {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::FileNotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = default_config_file().filter(|path| path.is_file()) {
                    tracing::debug!(path = %path.display(), "using default config file");
                    figment = figment.merge(Toml::file(path));
                }
            }
        }
        let settings: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        // A zero deadline would make every request fail before it's sent.
        if settings.remote.timeout_secs == 0 {
            exn::bail!(ErrorKind::Load);
        }
        Ok(settings)
    }

    /// The database path with `~` expanded.
    pub fn database_path(&self) -> Result<PathBuf> {
        expand_home(&self.database)
    }
}
