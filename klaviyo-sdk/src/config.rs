//! SDK configuration, read from a TOML file.
//!
//! ```toml
//! api_key = "PUBLIC_KEY"
//! session_timeout = "infinite"   # or seconds
//! log_level = "debug"
//!
//! [linking]
//! tracking_domains = ["klviyomail.com", "click.brand.example"]
//! ```

use crate::error::SdkResult;
use klaviyo_linking::LinkingConfig;
use klaviyo_types::SessionTimeout;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Public company key.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub session_timeout: SessionTimeout,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub linking: LinkingConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            session_timeout: SessionTimeout::default(),
            log_level: default_log_level(),
            linking: LinkingConfig::default(),
        }
    }
}

impl SdkConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_session_timeout(mut self, session_timeout: SessionTimeout) -> Self {
        self.session_timeout = session_timeout;
        self
    }

    #[must_use]
    pub fn with_linking(mut self, linking: LinkingConfig) -> Self {
        self.linking = linking;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> SdkResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads config from `path`, falling back to defaults when the file is
    /// missing, unreadable or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded SDK config from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "Failed to load config file {:?}: {}. Falling back to defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }
}
