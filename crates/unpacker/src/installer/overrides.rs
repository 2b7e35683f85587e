//! Override tree merging
//!
//! Copies the pack's static overrides verbatim into the install directory:
//! directories merge recursively (existing subtrees are preserved,
//! individual files are overwritten by the override's version), plain files
//! overwrite whatever is at their path. Copy errors are fatal to the run but
//! already-merged files stay in place. The overrides directory itself is
//! deleted after a successful merge.

use std::path::Path;

use futures::future::BoxFuture;
use tokio::fs;
use tracing::debug;

use super::core::error::{FileOperation, InstallError, Result};
use super::core::{StatusCallback, StatusEvent};

/// Merge `overrides_dir` into `target`, then delete `overrides_dir`.
///
/// Returns the number of top-level entries merged.
pub async fn merge_overrides(
    overrides_dir: &Path,
    target: &Path,
    status_callback: Option<StatusCallback>,
) -> Result<usize> {
    let mut entries = read_dir(overrides_dir).await?;
    let mut merged = 0usize;

    while let Some(entry) = next_entry(&mut entries, overrides_dir).await? {
        let dest = target.join(entry.file_name());
        let file_type = entry
            .file_type()
            .await
            .map_err(|source| InstallError::FileSystem {
                path: entry.path(),
                operation: FileOperation::Metadata,
                source,
            })?;

        if file_type.is_dir() {
            copy_dir_recursive(&entry.path(), &dest).await?;
        } else {
            copy_file(&entry.path(), &dest).await?;
        }
        debug!("Merged override entry {}", dest.display());
        merged += 1;
    }

    fs::remove_dir_all(overrides_dir)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: overrides_dir.to_path_buf(),
            operation: FileOperation::Delete,
            source,
        })?;

    if let Some(ref callback) = status_callback {
        callback(StatusEvent::OverridesMerged { entries: merged });
    }
    Ok(merged)
}

fn copy_dir_recursive<'a>(src: &'a Path, dest: &'a Path) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        fs::create_dir_all(dest)
            .await
            .map_err(|source| InstallError::FileSystem {
                path: dest.to_path_buf(),
                operation: FileOperation::CreateDir,
                source,
            })?;

        let mut entries = read_dir(src).await?;
        while let Some(entry) = next_entry(&mut entries, src).await? {
            let entry_dest = dest.join(entry.file_name());
            let file_type = entry
                .file_type()
                .await
                .map_err(|source| InstallError::FileSystem {
                    path: entry.path(),
                    operation: FileOperation::Metadata,
                    source,
                })?;
            if file_type.is_dir() {
                copy_dir_recursive(&entry.path(), &entry_dest).await?;
            } else {
                copy_file(&entry.path(), &entry_dest).await?;
            }
        }
        Ok(())
    })
}

async fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dest.to_path_buf(),
            operation: FileOperation::Write,
            source,
        })?;
    Ok(())
}

async fn read_dir(dir: &Path) -> Result<fs::ReadDir> {
    fs::read_dir(dir)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::Read,
            source,
        })
}

async fn next_entry(entries: &mut fs::ReadDir, dir: &Path) -> Result<Option<fs::DirEntry>> {
    entries
        .next_entry()
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::Read,
            source,
        })
}
