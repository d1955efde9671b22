use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Release host constants
// =============================================================================

/// Default base URL for the GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repository whose releases are checked when none is configured
pub const DEFAULT_REPOSITORY: &str = "auduongtuan/messengerify";

/// Product name used in asset names and as the default User-Agent
pub const DEFAULT_PRODUCT_NAME: &str = "Messengerify";

/// Asset file extension when none is configured
pub const DEFAULT_EXTENSION: &str = "zip";

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for release metadata requests in milliseconds (30 seconds)
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Timeout for establishing a connection in milliseconds (10 seconds)
pub const CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default interval between background checks in milliseconds (6 hours)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 6 * 60 * 60 * 1000;

/// Lower bound for the background check interval in milliseconds (1 minute)
pub const MIN_CHECK_INTERVAL_MS: u64 = 60_000;

/// Maximum number of redirects followed by a single download
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub base_url: String,
    /// `owner/name` of the repository publishing releases
    pub repository: String,
    pub product_name: String,
    /// Falls back to `product_name` when unset
    pub user_agent: Option<String>,
    pub platform: String,
    pub arch: String,
    pub extension: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_redirects: u32,
    pub check_interval_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            user_agent: None,
            platform: current_platform().to_string(),
            arch: current_arch().to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
        }
    }
}

impl UpdaterConfig {
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(&self.product_name)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Interval between background checks, never shorter than one minute
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms.max(MIN_CHECK_INTERVAL_MS))
    }
}

/// CPU architecture in release naming (`x64`, `arm64`, ...)
pub fn current_arch() -> &'static str {
    arch_label(std::env::consts::ARCH)
}

/// Operating system in release naming (`mac`, `win`, `linux`, ...)
pub fn current_platform() -> &'static str {
    platform_label(std::env::consts::OS)
}

fn arch_label(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "ia32",
        other => other,
    }
}

fn platform_label(os: &'static str) -> &'static str {
    match os {
        "macos" => "mac",
        "windows" => "win",
        other => other,
    }
}

/// Returns the path to the data directory for release-updater.
/// Uses $XDG_DATA_HOME/release-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-updater,
/// or ./release-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Returns the default directory downloads are written to.
pub fn download_dir() -> PathBuf {
    data_dir().join("downloads")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-updater")
}
