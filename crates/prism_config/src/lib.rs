//! Parsing and validation of `prism.toml` configuration files.
//!
//! This crate reads the shader cache settings and produces a strongly-typed
//! [`CacheConfig`] from which the cache location and [`TargetProfile`] are derived.
//!
//! [`TargetProfile`]: prism_common::TargetProfile

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
