//! Custom error types for the common library
//!
//! This module defines the errors raised while assembling the runtime
//! configuration shared by the playback crates and the probe binary.

use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The underlying configuration source could not be read or deserialized
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    /// A value was present but unusable
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid {
        /// Environment key that carried the value
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
