//! Resolution of the latest release into a downloadable update

use std::sync::Arc;

use tracing::{debug, info};

use crate::update::error::UpdateError;
use crate::update::release::{AssetNaming, ReleaseDescriptor, is_plain_file_name};
use crate::update::source::ReleaseSource;
use crate::update::version::{is_newer, strip_v_prefix};

/// Turns the latest release of a [`ReleaseSource`] into a [`ReleaseDescriptor`]
/// for the running platform.
pub struct ReleaseResolver {
    source: Arc<dyn ReleaseSource>,
    naming: AssetNaming,
}

impl ReleaseResolver {
    pub fn new(source: Arc<dyn ReleaseSource>, naming: AssetNaming) -> Self {
        Self { source, naming }
    }

    /// Resolve the latest release against `current_version`
    ///
    /// # Returns
    /// * `Ok(Some(_))` - A newer release with an installer for this platform
    /// * `Ok(None)` - Already up to date, or no unique asset matches the naming template
    /// * `Err(UpdateError)` - The release host could not be queried
    pub async fn resolve_latest(
        &self,
        current_version: &str,
    ) -> Result<Option<ReleaseDescriptor>, UpdateError> {
        let release = self.source.fetch_latest_release().await?;
        let latest_version = strip_v_prefix(&release.tag_name).to_string();

        info!(
            "Current version: {}, latest version: {}",
            current_version, latest_version
        );

        if !is_newer(current_version, &latest_version) {
            info!("No update available");
            return Ok(None);
        }

        let asset_name = self.naming.asset_name(&latest_version);
        if !is_plain_file_name(&asset_name) {
            info!(
                "Ignoring release {}: {} is not a plain file name",
                release.tag_name, asset_name
            );
            return Ok(None);
        }

        let Some(asset) = release.unique_asset(&asset_name) else {
            info!("No unique asset found for {}", asset_name);
            return Ok(None);
        };

        let checksum = match release.unique_asset(&self.naming.checksum_name(&latest_version)) {
            Some(sidecar) => {
                debug!("Fetching checksum from {}", sidecar.browser_download_url);
                let text = self.source.fetch_text(&sidecar.browser_download_url).await?;
                Some(text.trim().to_string()).filter(|c| !c.is_empty())
            }
            None => None,
        };

        Ok(Some(ReleaseDescriptor {
            version: latest_version,
            download_url: asset.browser_download_url.clone(),
            file_name: asset.name.clone(),
            checksum,
            release_notes: release.body.filter(|body| !body.trim().is_empty()),
        }))
    }
}
