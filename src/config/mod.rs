//! Configuration loading and management for the diária ledger.
//!
//! This module loads the engine settings and the user directory from YAML
//! files.
//!
//! # Example
//!
//! ```no_run
//! use diaria_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Users configured: {}", config.users().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineSettings, UserDirectory, UsersConfig};
