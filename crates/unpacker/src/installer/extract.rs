//! Archive extraction
//!
//! Unpacks the downloaded zip into the install directory. Every entry name
//! is validated before anything is written: an entry whose normalized path
//! would land outside the destination fails the whole extraction with zero
//! files written, so a hostile archive cannot overwrite arbitrary
//! filesystem locations. On success the archive file is deleted; on failure
//! it is left in place for diagnostics.

use std::io;
use std::path::{Path, PathBuf};

use tokio::task;
use tracing::debug;

use super::core::error::{ExtractionError, FileOperation, InstallError, Result};
use super::core::{StatusCallback, StatusEvent};

/// Extract `archive` into `dest`, then delete the archive.
pub async fn extract_archive(
    archive: &Path,
    dest: &Path,
    status_callback: Option<StatusCallback>,
) -> Result<()> {
    let archive_path = archive.to_path_buf();
    let dest_dir = dest.to_path_buf();

    let outcome = task::spawn_blocking(move || extract_blocking(&archive_path, &dest_dir))
        .await
        .map_err(|source| InstallError::Task { source })?;

    outcome.map_err(|source| InstallError::ExtractionFailed {
        archive: archive.to_path_buf(),
        source,
    })?;

    tokio::fs::remove_file(archive)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: archive.to_path_buf(),
            operation: FileOperation::Delete,
            source,
        })?;

    if let Some(ref callback) = status_callback {
        callback(StatusEvent::ArchiveExtracted {
            dir: dest.to_path_buf(),
        });
    }

    Ok(())
}

fn extract_blocking(archive: &Path, dest: &Path) -> std::result::Result<(), ExtractionError> {
    let file = std::fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    // Validate every entry name up front so a hostile entry rejects the
    // archive before a single file lands on disk.
    let mut entry_paths: Vec<Option<PathBuf>> = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index_raw(index)?;
        match entry.enclosed_name() {
            Some(relative) => entry_paths.push(Some(dest.join(relative))),
            None => {
                return Err(ExtractionError::UnsafeEntry {
                    name: entry.name().to_string(),
                });
            }
        }
    }

    std::fs::create_dir_all(dest)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(out_path) = entry_paths[index].take() else {
            continue;
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = std::fs::File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
        debug!("Extracted {}", out_path.display());
    }

    Ok(())
}
