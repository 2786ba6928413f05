//! TOML configuration for the `taxnarrate` binary.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"
//! connection_string = "taxnarrate.db"
//!
//! [logging]
//! level = "warn"
//! file = "taxnarrate.log"
//!
//! [simulation]
//! delay_scale = 0.5
//! ```
//!
//! Every section and key is optional.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use narrate_core::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "TAXNARRATE_CONFIG";

/// Looked for in the working directory when nothing else names a file.
pub const DEFAULT_CONFIG_FILE: &str = "taxnarrate.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            backend: store.backend,
            connection_string: store.connection_string,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A bare level or any `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier on the simulated gateway's stage delays.
    pub delay_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { delay_scale: 1.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Picks the first of: `explicit`, `$TAXNARRATE_CONFIG`,
    /// `./taxnarrate.toml`. The working-directory default is only chosen
    /// when it exists.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        Self::locate_from(
            explicit,
            std::env::var_os(CONFIG_ENV),
            Path::new(DEFAULT_CONFIG_FILE),
        )
    }

    /// Reads `path`, or returns defaults when there is none.
    ///
    /// # Errors
    ///
    /// A located file must exist and parse.
    pub fn load_located(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn locate_from(
        explicit: Option<&Path>,
        from_env: Option<OsString>,
        fallback: &Path,
    ) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| from_env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .or_else(|| fallback.is_file().then(|| fallback.to_path_buf()))
    }

    #[cfg(test)]
    fn load_from(
        explicit: Option<&Path>,
        from_env: Option<OsString>,
        fallback: &Path,
    ) -> Result<Self, ConfigError> {
        Self::load_located(Self::locate_from(explicit, from_env, fallback).as_deref())
    }

    /// Command-line values take precedence over the file.
    pub fn with_storage_overrides(
        mut self,
        backend: Option<String>,
        connection_string: Option<String>,
    ) -> Self {
        if let Some(backend) = backend {
            self.storage.backend = backend;
        }
        if let Some(connection_string) = connection_string {
            self.storage.connection_string = connection_string;
        }
        self
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.storage.backend.clone(),
            connection_string: self.storage.connection_string.clone(),
        }
    }
}
