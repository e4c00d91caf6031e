//! Network settings for the package feed

use serde::{Deserialize, Serialize};

/// Environment variable overriding the package feed base URL
pub const FEED_URL_ENV: &str = "WINSDK_NUGET_FEED";

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Base URL of the NuGet v3 flat container
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Where the NuGet command-line executable is downloaded from
    #[serde(default = "default_nuget_exe_url")]
    pub nuget_exe_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            nuget_exe_url: default_nuget_exe_url(),
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    /// Defaults with the feed URL taken from `WINSDK_NUGET_FEED` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(feed) = std::env::var(FEED_URL_ENV) {
            if !feed.trim().is_empty() {
                config.feed_url = feed.trim().to_string();
            }
        }
        config
    }

    /// Override the feed URL
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Override the NuGet executable URL
    pub fn with_nuget_exe_url(mut self, url: impl Into<String>) -> Self {
        self.nuget_exe_url = url.into();
        self
    }
}

fn default_feed_url() -> String {
    "https://api.nuget.org/v3-flatcontainer".to_string()
}
fn default_nuget_exe_url() -> String {
    "https://dist.nuget.org/win-x86-commandline/latest/nuget.exe".to_string()
}
fn default_http_timeout() -> u64 {
    300 // 5 minutes
}
fn default_user_agent() -> String {
    format!(
        "winsdk/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
