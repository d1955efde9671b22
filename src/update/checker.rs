//! Update check-and-download workflow

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::UpdaterConfig;
use crate::update::downloader::Downloader;
use crate::update::error::UpdateError;
use crate::update::release::{AssetNaming, ReleaseDescriptor, is_plain_file_name};
use crate::update::resolver::ReleaseResolver;
use crate::update::source::ReleaseSource;
use crate::update::sources::GitHubReleaseSource;
use crate::update::verify::{self, Verification};

/// Resolves, downloads and verifies application updates.
///
/// Does not coordinate overlapping calls; callers run one cycle at a time.
pub struct UpdateChecker {
    resolver: ReleaseResolver,
    downloader: Downloader,
}

impl UpdateChecker {
    /// Create a checker backed by the GitHub Releases API
    pub fn new(config: &UpdaterConfig) -> Result<Self, UpdateError> {
        let source = Arc::new(GitHubReleaseSource::new(config)?);
        Self::with_source(config, source)
    }

    /// Create a checker reading releases from `source`
    pub fn with_source(
        config: &UpdaterConfig,
        source: Arc<dyn ReleaseSource>,
    ) -> Result<Self, UpdateError> {
        Ok(Self {
            resolver: ReleaseResolver::new(source, AssetNaming::from_config(config)),
            downloader: Downloader::new(config)?,
        })
    }

    pub async fn check_for_update(
        &self,
        current_version: &str,
    ) -> Result<Option<ReleaseDescriptor>, UpdateError> {
        self.resolver.resolve_latest(current_version).await
    }

    /// Background variant of [`Self::check_for_update`]: failures are logged and swallowed
    pub async fn check_quietly(&self, current_version: &str) -> Option<ReleaseDescriptor> {
        self.check_for_update(current_version)
            .await
            .inspect_err(|e| warn!("Failed to check for updates: {}", e))
            .ok()
            .flatten()
    }

    /// Download `update` into `directory` and verify it when a checksum is published.
    ///
    /// Returns the path of the downloaded installer. A file failing verification
    /// is removed before the error is returned. A `file_name` that is not a
    /// plain file name is rejected with [`UpdateError::Parse`].
    pub async fn download_update(
        &self,
        update: &ReleaseDescriptor,
        directory: &Path,
    ) -> Result<PathBuf, UpdateError> {
        if !is_plain_file_name(&update.file_name) {
            return Err(UpdateError::Parse(format!(
                "asset name {:?} is not a plain file name",
                update.file_name
            )));
        }

        tokio::fs::create_dir_all(directory).await?;
        let destination = directory.join(&update.file_name);

        self.downloader
            .download(&update.download_url, &destination)
            .await?;

        let Some(expected) = &update.checksum else {
            info!("No checksum published for {}, skipping verification", update.file_name);
            return Ok(destination);
        };

        let error = match verify::check(&destination, expected).await {
            Verification::Match => {
                info!("Verified {}", update.file_name);
                return Ok(destination);
            }
            Verification::Mismatch { actual } => UpdateError::ChecksumMismatch {
                expected: expected.clone(),
                actual,
            },
            Verification::Unreadable(e) => UpdateError::Io(e),
        };

        warn!("Verification of {:?} failed: {}", destination, error);
        if let Err(e) = tokio::fs::remove_file(&destination).await {
            warn!("Failed to remove unverified download {:?}: {}", destination, e);
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::release::{Release, ReleaseAsset};
    use crate::update::source::MockReleaseSource;
    use mockito::Server;
    use tempfile::TempDir;

    // printf 'hello world' | openssl dgst -sha512 -binary | base64
    const HELLO_WORLD_SHA512: &str =
        "MJ7MSJwS1utMxA9QyQLytNDtd+5RGnx6m808qG1M2G+YndNbxf9JlnDaNCVbRbDP2DDoH2Bdz33FVC6TrpzXbw==";

    fn config() -> UpdaterConfig {
        UpdaterConfig {
            product_name: "Desk".to_string(),
            arch: "x64".to_string(),
            platform: "mac".to_string(),
            extension: "zip".to_string(),
            ..Default::default()
        }
    }

    fn descriptor(url: String, checksum: Option<&str>) -> ReleaseDescriptor {
        ReleaseDescriptor {
            version: "2.0.0".to_string(),
            download_url: url,
            file_name: "Desk-2.0.0-x64-mac.zip".to_string(),
            checksum: checksum.map(str::to_string),
            release_notes: None,
        }
    }

    fn checker_without_releases() -> UpdateChecker {
        let mut source = MockReleaseSource::new();
        source.expect_fetch_latest_release().never();
        UpdateChecker::with_source(&config(), Arc::new(source)).unwrap()
    }

    #[tokio::test]
    async fn check_for_update_resolves_matching_asset() {
        let mut source = MockReleaseSource::new();
        source.expect_fetch_latest_release().return_once(|| {
            Ok(Release {
                tag_name: "v2.0.0".to_string(),
                name: None,
                body: None,
                assets: vec![ReleaseAsset {
                    name: "Desk-2.0.0-x64-mac.zip".to_string(),
                    browser_download_url: "https://example.com/Desk-2.0.0-x64-mac.zip"
                        .to_string(),
                    size: 11,
                }],
            })
        });
        let checker = UpdateChecker::with_source(&config(), Arc::new(source)).unwrap();

        let update = checker.check_for_update("1.9.9").await.unwrap().unwrap();

        assert_eq!(update.version, "2.0.0");
        assert_eq!(update.file_name, "Desk-2.0.0-x64-mac.zip");
    }

    #[tokio::test]
    async fn check_quietly_swallows_errors() {
        let mut source = MockReleaseSource::new();
        source.expect_fetch_latest_release().return_once(|| {
            Err(UpdateError::Http {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
        });
        let checker = UpdateChecker::with_source(&config(), Arc::new(source)).unwrap();

        assert_eq!(checker.check_quietly("1.0.0").await, None);
    }

    #[tokio::test]
    async fn download_update_verifies_published_checksum() {
        let mut server = Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let mock = server
            .mock("GET", "/Desk-2.0.0-x64-mac.zip")
            .with_status(200)
            .with_body("hello world")
            .create_async()
            .await;

        let update = descriptor(
            format!("{}/Desk-2.0.0-x64-mac.zip", server.url()),
            Some(HELLO_WORLD_SHA512),
        );
        let downloads = temp_dir.path().join("downloads");
        let path = checker_without_releases()
            .download_update(&update, &downloads)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(path, downloads.join("Desk-2.0.0-x64-mac.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn download_update_removes_file_on_checksum_mismatch() {
        let mut server = Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let mock = server
            .mock("GET", "/Desk-2.0.0-x64-mac.zip")
            .with_status(200)
            .with_body("tampered")
            .create_async()
            .await;

        let update = descriptor(
            format!("{}/Desk-2.0.0-x64-mac.zip", server.url()),
            Some(HELLO_WORLD_SHA512),
        );
        let result = checker_without_releases()
            .download_update(&update, temp_dir.path())
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(UpdateError::ChecksumMismatch { ref expected, .. }) if expected == HELLO_WORLD_SHA512
        ));
        assert!(!temp_dir.path().join("Desk-2.0.0-x64-mac.zip").exists());
    }

    #[tokio::test]
    async fn download_update_without_checksum_keeps_file() {
        let mut server = Server::new_async().await;
        let temp_dir = TempDir::new().unwrap();
        let mock = server
            .mock("GET", "/Desk-2.0.0-x64-mac.zip")
            .with_status(200)
            .with_body("unverified")
            .create_async()
            .await;

        let update = descriptor(format!("{}/Desk-2.0.0-x64-mac.zip", server.url()), None);
        let path = checker_without_releases()
            .download_update(&update, temp_dir.path())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(std::fs::read(&path).unwrap(), b"unverified");
    }

    #[tokio::test]
    async fn download_update_rejects_file_name_outside_directory() {
        let temp_dir = TempDir::new().unwrap();
        let downloads = temp_dir.path().join("a").join("downloads");
        let update = ReleaseDescriptor {
            file_name: "Desk-9.0.0/../../escaped-x64-mac.zip".to_string(),
            ..descriptor("https://example.com/Desk.zip".to_string(), None)
        };

        let result = checker_without_releases()
            .download_update(&update, &downloads)
            .await;

        assert!(matches!(result, Err(UpdateError::Parse(_))));
        assert!(!temp_dir.path().join("a").join("escaped-x64-mac.zip").exists());
        assert!(!downloads.exists());
    }
}
