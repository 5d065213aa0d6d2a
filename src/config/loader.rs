//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and the user directory from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineSettings, UserDirectory, UsersConfig};

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── settings.yaml   # data_dir, missing_override_policy
/// └── users.yaml      # usernames, password hashes, roles, linked companies
/// ```
///
/// # Example
///
/// ```no_run
/// use diaria_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Data directory: {}", loader.settings().data_dir.display());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    users: UserDirectory,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML (`ConfigParseError`)
    /// - A username appears twice in `users.yaml` (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("settings.yaml"))?;

        let users_path = path.join("users.yaml");
        let users_config = Self::load_yaml::<UsersConfig>(&users_path)?;
        let users = UserDirectory::from_users(users_config.users).map_err(|username| {
            EngineError::ConfigParseError {
                path: users_path.display().to_string(),
                message: format!("duplicate username '{}'", username),
            }
        })?;

        info!(
            config_dir = %path.display(),
            data_dir = %settings.data_dir.display(),
            users = users.len(),
            "Configuration loaded"
        );

        Ok(Self { settings, users })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the user directory.
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Splits the loader into its parts.
    pub fn into_parts(self) -> (EngineSettings, UserDirectory) {
        (self.settings, self.users)
    }
}
