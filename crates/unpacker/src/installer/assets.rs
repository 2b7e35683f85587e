//! Asset download and verification
//!
//! Resolves every mode-applicable manifest entry against the install
//! directory: entries already on disk are skipped without a request (a
//! repeated run over a partially-populated target is resumable), the rest
//! are fetched from their first download URL with bounded concurrency and
//! checked against their declared sha1/sha512 digests. Failures here are
//! per-file: they are reported and accumulated, never aborting the
//! remaining entries.

use std::path::Path;

use futures::StreamExt;
use futures::stream;
use reqwest::Client;
use sha1::{Digest, Sha1};
use sha2::Sha512;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use super::config::InstallConfig;
use super::core::error::{FileFailure, HashAlgorithm, InstallError, Result};
use super::core::manifest::{FileEntry, FileHashes};
use super::core::{StatusCallback, StatusEvent};

/// Outcome totals of one asset-resolution phase
#[derive(Debug, Default)]
pub struct AssetSummary {
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub failures: Vec<FileFailure>,
}

/// Per-entry outcome; per-file failures never become `Err`
enum AssetOutcome {
    Downloaded,
    /// Written to disk but the content digest did not match; the file is kept
    DownloadedWithMismatch(FileFailure),
    SkippedExisting,
    Failed(FileFailure),
}

/// Downloads and verifies manifest-declared assets
pub struct AssetDownloader {
    client: Client,
    max_concurrent: usize,
}

impl AssetDownloader {
    pub fn new(config: &InstallConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| InstallError::Client { source })?;
        Ok(Self {
            client,
            max_concurrent: config.max_concurrent_downloads.max(1),
        })
    }

    /// Resolve all `entries` into `target_root` with bounded concurrency.
    ///
    /// Entries write to distinct paths, so downloads need no coordination
    /// beyond the concurrency bound itself.
    pub async fn download_all(
        &self,
        entries: &[FileEntry],
        target_root: &Path,
        status_callback: Option<StatusCallback>,
    ) -> AssetSummary {
        debug!(
            "Resolving {} assets with max_concurrent={}",
            entries.len(),
            self.max_concurrent
        );

        let outcomes = stream::iter(entries)
            .map(|entry| {
                let callback = status_callback.clone();
                async move { self.download_entry(entry, target_root, callback).await }
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let mut summary = AssetSummary::default();
        for outcome in outcomes {
            match outcome {
                AssetOutcome::Downloaded => summary.downloaded += 1,
                AssetOutcome::DownloadedWithMismatch(failure) => {
                    summary.downloaded += 1;
                    summary.failures.push(failure);
                }
                AssetOutcome::SkippedExisting => summary.skipped_existing += 1,
                AssetOutcome::Failed(failure) => summary.failures.push(failure),
            }
        }
        summary
    }

    async fn download_entry(
        &self,
        entry: &FileEntry,
        target_root: &Path,
        status_callback: Option<StatusCallback>,
    ) -> AssetOutcome {
        let Some(dest) = entry.resolve_destination(target_root) else {
            return fail(
                &status_callback,
                FileFailure::UnsafePath {
                    path: entry.path.clone(),
                },
            );
        };

        // Success-by-skip: an asset already on disk is not re-fetched.
        if fs::try_exists(&dest).await.unwrap_or(false) {
            if let Some(ref callback) = status_callback {
                callback(StatusEvent::AssetSkippedExisting {
                    path: entry.path.clone(),
                });
            }
            return AssetOutcome::SkippedExisting;
        }

        let Some(url) = entry.primary_url() else {
            return fail(
                &status_callback,
                FileFailure::MissingDownloadUrl {
                    path: entry.path.clone(),
                },
            );
        };

        if let Some(ref callback) = status_callback {
            callback(StatusEvent::AssetStarted {
                path: entry.path.clone(),
                url: url.to_string(),
            });
        }

        let size = match self.fetch_to_file(url, &dest, &entry.path).await {
            Ok(size) => size,
            Err(failure) => return fail(&status_callback, failure),
        };

        if let Some(hashes) = &entry.hashes {
            match verify_hashes(&dest, &entry.path, hashes).await {
                Ok(None) => {}
                Ok(Some(mismatch)) => {
                    warn!("Hash mismatch for {}, file retained", entry.path);
                    if let Some(ref callback) = status_callback {
                        callback(StatusEvent::AssetFailed {
                            failure: mismatch.clone(),
                        });
                    }
                    return AssetOutcome::DownloadedWithMismatch(mismatch);
                }
                Err(failure) => return fail(&status_callback, failure),
            }
        }

        if let Some(ref callback) = status_callback {
            callback(StatusEvent::AssetDownloaded {
                path: entry.path.clone(),
                size,
            });
        }
        AssetOutcome::Downloaded
    }

    async fn fetch_to_file(
        &self,
        url: &str,
        dest: &Path,
        entry_path: &str,
    ) -> std::result::Result<u64, FileFailure> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileFailure::Io {
                    path: entry_path.to_string(),
                    error: e.to_string(),
                })?;
        }

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| FileFailure::Request {
                    path: entry_path.to_string(),
                    error: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FileFailure::DownloadFailed {
                path: entry_path.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = fs::File::create(dest).await.map_err(|e| FileFailure::Io {
            path: entry_path.to_string(),
            error: e.to_string(),
        })?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| FileFailure::Request {
                path: entry_path.to_string(),
                error: e.to_string(),
            })?;
            file.write_all(&chunk).await.map_err(|e| FileFailure::Io {
                path: entry_path.to_string(),
                error: e.to_string(),
            })?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| FileFailure::Io {
            path: entry_path.to_string(),
            error: e.to_string(),
        })?;

        Ok(written)
    }
}

fn fail(status_callback: &Option<StatusCallback>, failure: FileFailure) -> AssetOutcome {
    warn!("Asset failed: {}", failure);
    if let Some(callback) = status_callback {
        callback(StatusEvent::AssetFailed {
            failure: failure.clone(),
        });
    }
    AssetOutcome::Failed(failure)
}

/// Compare the written bytes against the declared digests.
///
/// Returns the first mismatch, or `None` when every declared digest checks
/// out. The file stays on disk either way.
async fn verify_hashes(
    dest: &Path,
    entry_path: &str,
    hashes: &FileHashes,
) -> std::result::Result<Option<FileFailure>, FileFailure> {
    let mut sha1_hasher = hashes.sha1.as_ref().map(|_| Sha1::new());
    let mut sha512_hasher = hashes.sha512.as_ref().map(|_| Sha512::new());
    if sha1_hasher.is_none() && sha512_hasher.is_none() {
        return Ok(None);
    }

    let mut file = fs::File::open(dest).await.map_err(|e| FileFailure::Io {
        path: entry_path.to_string(),
        error: e.to_string(),
    })?;
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer).await.map_err(|e| FileFailure::Io {
            path: entry_path.to_string(),
            error: e.to_string(),
        })?;
        if read == 0 {
            break;
        }
        let chunk = &buffer[..read];
        if let Some(ref mut hasher) = sha1_hasher {
            hasher.update(chunk);
        }
        if let Some(ref mut hasher) = sha512_hasher {
            hasher.update(chunk);
        }
    }

    if let (Some(expected), Some(hasher)) = (hashes.sha1.as_ref(), sha1_hasher) {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            return Ok(Some(FileFailure::HashMismatch {
                path: entry_path.to_string(),
                algorithm: HashAlgorithm::Sha1,
                expected: expected.clone(),
                actual,
            }));
        }
    }

    if let (Some(expected), Some(hasher)) = (hashes.sha512.as_ref(), sha512_hasher) {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            return Ok(Some(FileFailure::HashMismatch {
                path: entry_path.to_string(),
                algorithm: HashAlgorithm::Sha512,
                expected: expected.clone(),
                actual,
            }));
        }
    }

    Ok(None)
}
