//! Transient artifact cleanup
//!
//! The manifest is deleted only after every entry has been attempted; the
//! install directory is removed when a run leaves it completely empty, so no
//! confusing hollow directory is left behind.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use super::core::error::{FileOperation, InstallError, Result};
use super::core::{StatusCallback, StatusEvent};

/// Delete the processed manifest file.
pub async fn remove_manifest(manifest: &Path, status_callback: Option<StatusCallback>) -> Result<()> {
    fs::remove_file(manifest)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: manifest.to_path_buf(),
            operation: FileOperation::Delete,
            source,
        })?;
    debug!("Removed manifest {}", manifest.display());

    if let Some(ref callback) = status_callback {
        callback(StatusEvent::ManifestRemoved {
            path: manifest.to_path_buf(),
        });
    }
    Ok(())
}

/// Remove the install directory if it ended up with zero entries.
///
/// Returns whether the directory was removed.
pub async fn prune_empty_install(
    dir: &Path,
    status_callback: Option<StatusCallback>,
) -> Result<bool> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::Read,
            source,
        })?;

    let first = entries
        .next_entry()
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::Read,
            source,
        })?;
    if first.is_some() {
        return Ok(false);
    }

    fs::remove_dir(dir)
        .await
        .map_err(|source| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::Delete,
            source,
        })?;
    debug!("Removed empty install directory {}", dir.display());

    if let Some(ref callback) = status_callback {
        callback(StatusEvent::EmptyInstallRemoved {
            dir: dir.to_path_buf(),
        });
    }
    Ok(true)
}
