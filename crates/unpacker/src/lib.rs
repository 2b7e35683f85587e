//! Modpack installation library
//!
//! This library installs a remote modpack archive - a zip containing a
//! declarative manifest plus optional static overrides - into a local
//! directory tree. It fetches and extracts the archive, locates the
//! manifest and overrides, resolves every manifest entry applicable to the
//! configured install mode with bounded download concurrency and content
//! hash verification, merges the override tree, and cleans up transient
//! artifacts.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unpacker::{
//!     InstallConfig, InstallMode, InstallOutcome, Installer, StatusEvent,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> unpacker::Result<()> {
//! let config = InstallConfig::default()
//!     .with_output_root("/srv/packs")
//!     .with_mode(InstallMode::Server);
//!
//! let installer = Installer::new(config)?;
//!
//! // Observe progress from any thread; marshaling onto a UI thread is the
//! // consumer's job.
//! let callback = Arc::new(|event: StatusEvent| match event {
//!     StatusEvent::AssetDownloaded { path, size } => {
//!         println!("downloaded {} ({} bytes)", path, size);
//!     }
//!     StatusEvent::AssetFailed { failure } => {
//!         eprintln!("failed: {}", failure);
//!     }
//!     _ => {}
//! });
//!
//! let outcome = installer
//!     .install("https://example.com/packs/MyPack%2B1.0.mrpack", Some(callback))
//!     .await?;
//!
//! match outcome {
//!     InstallOutcome::Installed(report) => {
//!         println!(
//!             "{} downloaded, {} skipped, {} failed",
//!             report.downloaded,
//!             report.skipped_existing,
//!             report.failures.len()
//!         );
//!     }
//!     InstallOutcome::NothingToInstall { .. } => {
//!         println!("pack contained nothing to install");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Streamed archive fetch**: the pack archive is written to disk as it
//!   arrives, never buffered whole in memory
//! - **Hostile-archive protection**: zip entries that escape the install
//!   directory reject the whole archive before anything is written
//! - **Mode filtering**: entries marked unsupported for the active
//!   client/server mode are skipped with a status event
//! - **Resumable asset resolution**: assets already on disk are skipped
//!   without a network request
//! - **Integrity checking**: declared sha1/sha512 digests are verified;
//!   mismatches are reported and the file retained
//! - **Bounded concurrency**: asset downloads run through a small fixed pool
//! - **Two-tier errors**: fatal failures abort the run, per-file failures
//!   are accumulated into the returned report

pub mod catalog;
pub mod installer;

// Re-export commonly used types for convenience
pub use installer::{
    ConsoleStatusReporter, FileEntry, FileFailure, InstallConfig, InstallError, InstallMode,
    InstallOutcome, InstallReport, Installer, IntoStatusCallback, NullStatusReporter,
    PackManifest, Result, StatusCallback, StatusEvent, StatusReporter,
};

pub use catalog::{CatalogClient, CatalogError, PackHit};
