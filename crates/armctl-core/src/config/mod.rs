//! Configuration management for armctl
//!
//! Profiles are stored in TOML at the platform config directory. Credential
//! fields support `${VAR}` environment expansion so secrets can stay out of
//! the file.

#[allow(clippy::module_inception)]
mod config;
mod error;

pub use config::{Config, Profile};
pub use error::{ConfigError, Result};
