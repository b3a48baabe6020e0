//! Common library for the label website media core
//!
//! This crate provides shared functionality used across the playback
//! library and the probe binary: runtime configuration, its error types,
//! and tracing setup.
//!
//! ```rust,no_run
//! use common::{MediaConfig, telemetry::init_tracing};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing(tracing::Level::INFO);
//!     let config = MediaConfig::from_env()?;
//!     println!("Storage base URL: {}", config.storage_base_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod telemetry;

pub use crate::config::MediaConfig;
pub use crate::error::{ConfigError, ConfigResult};
