//! GitHub Releases API release source

use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::config::UpdaterConfig;
use crate::update::error::UpdateError;
use crate::update::release::Release;
use crate::update::source::ReleaseSource;

/// Release source backed by `GET /repos/{owner}/{repo}/releases/latest`
pub struct GitHubReleaseSource {
    client: reqwest::Client,
    base_url: String,
    repository: String,
}

impl GitHubReleaseSource {
    /// Creates a source for `repository` (`owner/name`) on the configured host
    pub fn new(config: &UpdaterConfig) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
        })
    }

    fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.base_url, self.repository)
    }
}

#[async_trait::async_trait]
impl ReleaseSource for GitHubReleaseSource {
    async fn fetch_latest_release(&self) -> Result<Release, UpdateError> {
        let url = self.latest_release_url();
        debug!("Fetching latest release: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(UpdateError::Http { status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse GitHub release response: {}", e);
            UpdateError::Parse(e.to_string())
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, UpdateError> {
        debug!("Fetching text asset: {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Text asset returned status {}: {}", status, url);
            return Err(UpdateError::Http { status });
        }

        Ok(response.text().await?)
    }
}
