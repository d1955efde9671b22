//! Release metadata types

use std::ffi::OsStr;
use std::path::Path;

use serde::Deserialize;

use crate::config::UpdaterConfig;

/// Suffix of the sidecar asset carrying an installer's base64 SHA-512
pub const CHECKSUM_SUFFIX: &str = ".sha512";

/// Release as returned by the GitHub Releases API
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Returns the asset named exactly `name`, or None when there is not exactly one
    pub fn unique_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        let mut matches = self.assets.iter().filter(|asset| asset.name == name);
        match (matches.next(), matches.next()) {
            (Some(asset), None) => Some(asset),
            _ => None,
        }
    }
}

/// An update ready to be downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// Version without the leading `v`
    pub version: String,
    pub download_url: String,
    pub file_name: String,
    /// Base64 SHA-512 of the asset, when the release publishes one
    pub checksum: Option<String>,
    pub release_notes: Option<String>,
}

/// Builds installer asset names: `{product}-{version}-{arch}-{platform}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetNaming {
    pub product_name: String,
    pub arch: String,
    pub platform: String,
    pub extension: String,
}

impl AssetNaming {
    pub fn from_config(config: &UpdaterConfig) -> Self {
        Self {
            product_name: config.product_name.clone(),
            arch: config.arch.clone(),
            platform: config.platform.clone(),
            extension: config.extension.clone(),
        }
    }

    pub fn asset_name(&self, version: &str) -> String {
        format!(
            "{}-{}-{}-{}.{}",
            self.product_name, version, self.arch, self.platform, self.extension
        )
    }

    pub fn checksum_name(&self, version: &str) -> String {
        format!("{}{}", self.asset_name(version), CHECKSUM_SUFFIX)
    }
}

/// True when `name` is a single file name with no directory components
pub fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && Path::new(name).file_name() == Some(OsStr::new(name))
}
