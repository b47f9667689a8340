//! Parsing and validation of `diagram.toml` cache configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`DiagramConfig`] whose `[cache]` section tunes the diagram cache.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
