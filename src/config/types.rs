use serde::{Deserialize, Serialize};

use crate::model::DisplayMetrics;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the photo service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key sent with every image request.
    #[serde(default)]
    pub api_key: String,
}

/// Screen size used to compute image target dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_width")]
    pub width: u32,
    #[serde(default = "default_display_height")]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_base_url() -> String {
    "https://api.photostate.local".to_string()
}

fn default_display_width() -> u32 {
    1080
}

fn default_display_height() -> u32 {
    1920
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl DisplayConfig {
    pub fn metrics(&self) -> DisplayMetrics {
        DisplayMetrics {
            width: self.width,
            height: self.height,
        }
    }
}
