//! Runtime configuration for media playback
//!
//! Values are read from `MEDIA_*` environment variables through the
//! `config` crate. The only setting the resolver strictly needs is the
//! storage base URL that relative media paths are joined against.

use std::time::Duration;

use ::config::{Config, Environment};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Public base URL used when `MEDIA_PUBLIC_BASE_URL` is not set
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";

/// Path appended to the public base URL to reach uploaded files
pub const STORAGE_PATH: &str = "storage";

/// Media configuration shared by the player overlay and the probe binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Public base URL of the backend (e.g., "https://api.example.com")
    pub public_base_url: String,
    /// Base URL that storage-relative media paths are joined to
    pub storage_base_url: String,
    /// How long a load may stay pending before it is reported as failed
    pub load_timeout: Option<Duration>,
    /// Whether the YouTube embed starts playing as soon as it is mounted
    pub youtube_autoplay: bool,
}

#[derive(Debug, Deserialize)]
struct RawMediaConfig {
    public_base_url: String,
    #[serde(default)]
    storage_base_url: Option<String>,
    #[serde(default)]
    load_timeout_secs: Option<u64>,
    youtube_autoplay: bool,
}

impl MediaConfig {
    /// Build a configuration around an explicit storage base URL
    pub fn with_storage_base_url(storage_base_url: impl Into<String>) -> Self {
        Self {
            storage_base_url: storage_base_url.into(),
            ..Self::default()
        }
    }

    /// Create a new MediaConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MEDIA_PUBLIC_BASE_URL`: Backend base URL (default: "http://localhost:8000")
    /// - `MEDIA_STORAGE_BASE_URL`: Storage base URL (default: "<public base>/storage")
    /// - `MEDIA_LOAD_TIMEOUT_SECS`: Load timeout in seconds (default: none, 0 disables)
    /// - `MEDIA_YOUTUBE_AUTOPLAY`: Autoplay YouTube embeds (default: true)
    pub fn from_env() -> ConfigResult<Self> {
        let settings = Config::builder()
            .set_default("public_base_url", DEFAULT_PUBLIC_BASE_URL)?
            .set_default("youtube_autoplay", true)?
            .add_source(Environment::with_prefix("MEDIA").try_parsing(true))
            .build()?;

        let raw: RawMediaConfig = settings.try_deserialize()?;
        let config = Self::from_raw(raw)?;

        info!(
            "Media configuration loaded with storage base URL: {}",
            config.storage_base_url
        );
        Ok(config)
    }

    fn from_raw(raw: RawMediaConfig) -> ConfigResult<Self> {
        let public_base_url = raw.public_base_url.trim().trim_end_matches('/').to_string();
        if public_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: "MEDIA_PUBLIC_BASE_URL",
                reason: "must not be empty".to_string(),
            });
        }

        let storage_base_url = match raw.storage_base_url {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if url.is_empty() {
                    return Err(ConfigError::Invalid {
                        key: "MEDIA_STORAGE_BASE_URL",
                        reason: "must not be empty when set".to_string(),
                    });
                }
                url
            }
            None => format!("{}/{}", public_base_url, STORAGE_PATH),
        };

        let load_timeout = match raw.load_timeout_secs {
            Some(0) => {
                warn!("MEDIA_LOAD_TIMEOUT_SECS is 0, load timeout disabled");
                None
            }
            other => other.map(Duration::from_secs),
        };

        Ok(Self {
            public_base_url,
            storage_base_url,
            load_timeout,
            youtube_autoplay: raw.youtube_autoplay,
        })
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            storage_base_url: format!("{}/{}", DEFAULT_PUBLIC_BASE_URL, STORAGE_PATH),
            load_timeout: None,
            youtube_autoplay: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 4] = [
        "MEDIA_PUBLIC_BASE_URL",
        "MEDIA_STORAGE_BASE_URL",
        "MEDIA_LOAD_TIMEOUT_SECS",
        "MEDIA_YOUTUBE_AUTOPLAY",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_media_config_defaults() {
        clear_env();

        let config = MediaConfig::from_env().expect("Failed to load media config");
        assert_eq!(config, MediaConfig::default());
        assert_eq!(config.storage_base_url, "http://localhost:8000/storage");
    }

    #[test]
    #[serial]
    fn test_storage_url_derived_from_public_base() {
        clear_env();
        unsafe { std::env::set_var("MEDIA_PUBLIC_BASE_URL", "https://api.example.com/") };

        let config = MediaConfig::from_env().expect("Failed to load media config");
        assert_eq!(config.public_base_url, "https://api.example.com");
        assert_eq!(config.storage_base_url, "https://api.example.com/storage");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_explicit_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("MEDIA_STORAGE_BASE_URL", "https://cdn.example.com/storage");
            std::env::set_var("MEDIA_LOAD_TIMEOUT_SECS", "15");
            std::env::set_var("MEDIA_YOUTUBE_AUTOPLAY", "false");
        }

        let config = MediaConfig::from_env().expect("Failed to load media config");
        assert_eq!(config.storage_base_url, "https://cdn.example.com/storage");
        assert_eq!(config.load_timeout, Some(Duration::from_secs(15)));
        assert!(!config.youtube_autoplay);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_timeout_disables_watchdog() {
        clear_env();
        unsafe { std::env::set_var("MEDIA_LOAD_TIMEOUT_SECS", "0") };

        let config = MediaConfig::from_env().expect("Failed to load media config");
        assert_eq!(config.load_timeout, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_public_base_is_rejected() {
        clear_env();
        unsafe { std::env::set_var("MEDIA_PUBLIC_BASE_URL", "  ") };

        let err = MediaConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "MEDIA_PUBLIC_BASE_URL",
                ..
            }
        ));

        clear_env();
    }
}
