//! Streaming download of release assets

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode, Url, redirect};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::UpdaterConfig;
use crate::update::error::UpdateError;

/// Downloads a single URL to a local path, following a bounded number of redirects.
///
/// The destination either holds the complete body or does not exist once
/// [`Downloader::download`] returns, including when the future is dropped
/// mid-transfer.
pub struct Downloader {
    client: Client,
    max_redirects: u32,
}

impl Downloader {
    pub fn new(config: &UpdaterConfig) -> Result<Self, UpdateError> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .connect_timeout(config.connect_timeout())
            // bounds each read, not the whole transfer
            .read_timeout(config.request_timeout())
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    pub async fn download(&self, url: &str, destination: &Path) -> Result<(), UpdateError> {
        let mut url = Url::parse(url)
            .map_err(|e| UpdateError::Parse(format!("invalid download URL {url}: {e}")))?;
        let mut redirects = 0;

        info!("Downloading {} to {:?}", url, destination);

        loop {
            let mut target = DownloadTarget::create(url.clone(), destination).await?;
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if is_redirect(status) {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| url.join(v).ok());

                if let Some(next) = location {
                    target.discard().await?;

                    if redirects == self.max_redirects {
                        warn!("Giving up on {} after {} redirects", next, redirects);
                        return Err(UpdateError::TooManyRedirects {
                            limit: self.max_redirects,
                        });
                    }
                    redirects += 1;

                    debug!("Redirected ({}) to {}", status, next);
                    url = next;
                    continue;
                }
            }

            if !status.is_success() {
                warn!("Download of {} failed with status {}", url, status);
                return Err(UpdateError::Http { status });
            }

            let written = target
                .write_stream(response.bytes_stream())
                .await
                .inspect_err(|e| {
                    warn!(
                        "Transfer from {} to {:?} failed: {}",
                        target.source(),
                        target.path(),
                        e
                    )
                })?;
            target.finish().await?;

            info!("Downloaded {} bytes to {:?}", written, destination);
            return Ok(());
        }
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// A destination file being written from a source URL.
///
/// Owns the file handle for the duration of the transfer. Unless
/// [`DownloadTarget::finish`] succeeds the file is removed on drop.
pub struct DownloadTarget {
    source: Url,
    path: PathBuf,
    file: Option<File>,
    keep: bool,
}

impl DownloadTarget {
    pub async fn create(source: Url, path: &Path) -> Result<Self, UpdateError> {
        let file = File::create(path).await?;
        Ok(Self {
            source,
            path: path.to_path_buf(),
            file: Some(file),
            keep: false,
        })
    }

    pub fn source(&self) -> &Url {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy every chunk of `stream` into the file, returning the byte count
    pub async fn write_stream<S, B, E>(&mut self, stream: S) -> Result<u64, UpdateError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        UpdateError: From<E>,
    {
        let Some(file) = self.file.as_mut() else {
            return Err(UpdateError::Io(std::io::Error::other(
                "download target already closed",
            )));
        };

        let mut stream = std::pin::pin!(stream);
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(UpdateError::from)?;
            let bytes = chunk.as_ref();
            file.write_all(bytes).await.map_err(UpdateError::Io)?;
            written += bytes.len() as u64;
        }

        Ok(written)
    }

    /// Flush and close the file, keeping it on disk
    pub async fn finish(mut self) -> Result<(), UpdateError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        self.keep = true;
        Ok(())
    }

    /// Close and delete the file
    pub async fn discard(mut self) -> Result<(), UpdateError> {
        self.file.take();
        self.keep = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for DownloadTarget {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        self.file.take();
        if std::fs::remove_file(&self.path).is_ok() {
            debug!("Removed partial download {:?} from {}", self.path, self.source);
        }
    }
}
