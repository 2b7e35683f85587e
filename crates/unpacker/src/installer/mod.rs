//! Installer module
//!
//! This module contains the manifest-driven installation pipeline:
//! core types, configuration, archive fetch/extract, manifest location,
//! asset resolution, override merging and cleanup.

pub mod assets;
pub mod cleanup;
pub mod config;
pub mod core;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod overrides;
pub mod pipeline;

// Re-export main types for convenience
pub use assets::{AssetDownloader, AssetSummary};
pub use config::InstallConfig;
pub use core::{
    ConsoleStatusReporter, EnvSupport, ExtractionError, FileEntry, FileFailure, FileHashes,
    FileOperation, HashAlgorithm, InstallError, InstallMode, InstallOutcome, InstallReport,
    IntoStatusCallback, NullStatusReporter, PackManifest, Result, StatusCallback, StatusEvent,
    StatusReporter, install_name, resolve_inside,
};
pub use fetch::ArchiveFetcher;
pub use locate::{LocatedPack, MANIFEST_FILE_NAME, OVERRIDES_DIR_NAME, locate_pack};
pub use pipeline::Installer;

#[cfg(test)]
mod tests;
