//! Core types used throughout the installation pipeline
//!
//! This module contains the fundamental types that all other modules depend
//! on. By organizing these in a core module, we make the dependency
//! relationships clear.

pub mod error;
pub mod events;
pub mod manifest;

// Re-export main types for convenience
pub use error::{
    ExtractionError, FileFailure, FileOperation, HashAlgorithm, InstallError, Result,
};
pub use events::{
    ConsoleStatusReporter, IntoStatusCallback, NullStatusReporter, StatusCallback, StatusEvent,
    StatusReporter,
};
pub use manifest::{EnvSupport, FileEntry, FileHashes, PackManifest, resolve_inside};

use std::path::{Path, PathBuf};

use url::Url;

/// Which side of a pack to install; fixed for the duration of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Client,
    Server,
}

/// Terminal result of a pipeline run that did not hit a fatal error
#[derive(Debug)]
pub enum InstallOutcome {
    /// The pack was installed; the report may still carry per-file failures
    Installed(InstallReport),
    /// The archive contained neither a manifest nor an overrides directory
    NothingToInstall { install_dir: PathBuf },
}

/// Summary of one installation run
#[derive(Debug, Default)]
pub struct InstallReport {
    pub install_name: String,
    pub install_dir: PathBuf,
    /// Assets written to disk this run (including hash-mismatched ones)
    pub downloaded: usize,
    /// Assets already present; no request was made for these
    pub skipped_existing: usize,
    /// Entries excluded by the mode filter
    pub skipped_unsupported: usize,
    /// Accumulated per-file failures, in completion order
    pub failures: Vec<FileFailure>,
    pub overrides_merged: bool,
}

impl InstallReport {
    /// Whether every attempted entry succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of manifest entries the run attempted to resolve
    pub fn attempted(&self) -> usize {
        self.downloaded + self.skipped_existing
            + self
                .failures
                .iter()
                .filter(|f| !f.file_retained())
                .count()
    }
}

/// Derive the install name from a source URL.
///
/// The name is the archive's base filename, percent-decoded, with its
/// extension stripped; every artifact of the run lives under
/// `output_root/<name>/`.
pub fn install_name(source_url: &str) -> Result<String> {
    let parsed = Url::parse(source_url).map_err(|source| InstallError::InvalidUrl {
        url: source_url.to_string(),
        source,
    })?;
    let file_name = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("modpack");
    let decoded = urlencoding::decode(file_name)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| file_name.to_string());
    let stem = Path::new(&decoded)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or(decoded);
    Ok(stem)
}
