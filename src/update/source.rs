//! Release source trait for fetching release metadata

#[cfg(test)]
use mockall::automock;

use crate::update::error::UpdateError;
use crate::update::release::Release;

/// Trait for fetching release metadata from a release host
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches the latest published release
    ///
    /// # Returns
    /// * `Ok(Release)` - The release with its asset list
    /// * `Err(UpdateError)` - Transport failure, non-success status or malformed body
    async fn fetch_latest_release(&self) -> Result<Release, UpdateError>;

    /// Fetches a small text asset (e.g. a checksum sidecar) by URL
    async fn fetch_text(&self, url: &str) -> Result<String, UpdateError>;
}
