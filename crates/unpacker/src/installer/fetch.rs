//! Archive fetching
//!
//! Streamed retrieval of the remote pack archive into a local file. The body
//! is written byte-for-byte; content-type is not inspected. A non-success
//! response is fatal to the whole run - the caller may retry the operation,
//! the fetcher itself does not.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::config::InstallConfig;
use super::core::error::{FileOperation, InstallError, Result};
use super::core::{StatusCallback, StatusEvent};

/// Fetches the remote archive into a local file
pub struct ArchiveFetcher {
    client: Client,
}

impl ArchiveFetcher {
    pub fn new(config: &InstallConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| InstallError::Client { source })?;
        Ok(Self { client })
    }

    /// Download `url` to `dest`, returning the number of bytes written.
    pub async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        status_callback: Option<StatusCallback>,
    ) -> Result<u64> {
        debug!("Fetching archive: {} to {}", url, dest.display());

        if let Some(ref callback) = status_callback {
            callback(StatusEvent::ArchiveDownloadStarted {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| InstallError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| InstallError::FileSystem {
                    path: parent.to_path_buf(),
                    operation: FileOperation::CreateDir,
                    source,
                })?;
        }

        let mut file = fs::File::create(dest)
            .await
            .map_err(|source| InstallError::FileSystem {
                path: dest.to_path_buf(),
                operation: FileOperation::Create,
                source,
            })?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|source| InstallError::Request {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|source| InstallError::FileSystem {
                    path: dest.to_path_buf(),
                    operation: FileOperation::Write,
                    source,
                })?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|source| InstallError::FileSystem {
                path: dest.to_path_buf(),
                operation: FileOperation::Write,
                source,
            })?;

        if let Some(ref callback) = status_callback {
            callback(StatusEvent::ArchiveDownloaded {
                path: dest.to_path_buf(),
                size: written,
            });
        }

        debug!("Archive fetched: {} bytes", written);
        Ok(written)
    }
}
