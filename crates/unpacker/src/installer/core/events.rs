//! Status reporting for installation runs
//!
//! The pipeline emits `StatusEvent`s through a shared callback from whatever
//! task happens to be running, including concurrent asset downloads. The
//! callback must therefore tolerate concurrent invocation (`Send + Sync`);
//! marshaling events onto a single-threaded observer (a UI) is the
//! consumer's responsibility, not the pipeline's.

use std::path::PathBuf;
use std::sync::Arc;

use super::error::FileFailure;

/// Status callback invoked for every pipeline event
pub type StatusCallback = Arc<dyn Fn(StatusEvent) + Send + Sync>;

/// Events emitted during an installation run
#[derive(Debug, Clone)]
pub enum StatusEvent {
    ArchiveDownloadStarted {
        url: String,
    },
    ArchiveDownloaded {
        path: PathBuf,
        size: u64,
    },
    ArchiveExtracted {
        dir: PathBuf,
    },
    ManifestLocated {
        path: PathBuf,
    },
    OverridesLocated {
        path: PathBuf,
    },
    /// A manifest entry passed the mode filter and its download began
    AssetStarted {
        path: String,
        url: String,
    },
    AssetDownloaded {
        path: String,
        size: u64,
    },
    /// The asset was already on disk; no request was made
    AssetSkippedExisting {
        path: String,
    },
    /// The entry is marked unsupported for the active install mode
    AssetSkippedUnsupported {
        path: String,
    },
    /// A per-file failure; the run continues with the next entry
    AssetFailed {
        failure: FileFailure,
    },
    OverridesMerged {
        entries: usize,
    },
    ManifestRemoved {
        path: PathBuf,
    },
    /// The install directory ended up empty and was removed
    EmptyInstallRemoved {
        dir: PathBuf,
    },
    Finished {
        install_dir: PathBuf,
    },
}

/// Trait for observers that prefer a typed surface over a bare closure
pub trait StatusReporter: Send + Sync {
    fn on_event(&self, event: &StatusEvent);
}

/// Extension trait to convert a StatusReporter into a StatusCallback
pub trait IntoStatusCallback {
    fn into_callback(self) -> StatusCallback;
}

impl<T: StatusReporter + 'static> IntoStatusCallback for T {
    fn into_callback(self) -> StatusCallback {
        Arc::new(move |event| self.on_event(&event))
    }
}

/// Console status reporter for CLI consumers
#[derive(Debug, Default)]
pub struct ConsoleStatusReporter {
    pub verbose: bool,
}

impl ConsoleStatusReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl StatusReporter for ConsoleStatusReporter {
    fn on_event(&self, event: &StatusEvent) {
        match event {
            StatusEvent::ArchiveDownloadStarted { url } => {
                println!("Downloading modpack from: {}", url);
            }
            StatusEvent::ArchiveDownloaded { path, size } => {
                println!("Modpack downloaded to: {} ({} bytes)", path.display(), size);
            }
            StatusEvent::ArchiveExtracted { dir } => {
                println!("Modpack extracted to: {}", dir.display());
            }
            StatusEvent::ManifestLocated { path } => {
                if self.verbose {
                    println!("Manifest found at: {}", path.display());
                }
            }
            StatusEvent::OverridesLocated { path } => {
                if self.verbose {
                    println!("Overrides found at: {}", path.display());
                }
            }
            StatusEvent::AssetStarted { path, url } => {
                if self.verbose {
                    println!("Downloading {} from {}", path, url);
                }
            }
            StatusEvent::AssetDownloaded { path, size } => {
                println!("Downloaded {} ({} bytes)", path, size);
            }
            StatusEvent::AssetSkippedExisting { path } => {
                println!("Already present, skipping: {}", path);
            }
            StatusEvent::AssetSkippedUnsupported { path } => {
                println!("Not supported in this mode, skipping: {}", path);
            }
            StatusEvent::AssetFailed { failure } => {
                eprintln!("Failed: {}", failure);
            }
            StatusEvent::OverridesMerged { entries } => {
                println!("Merged {} override entries", entries);
            }
            StatusEvent::ManifestRemoved { path } => {
                if self.verbose {
                    println!("Removed manifest: {}", path.display());
                }
            }
            StatusEvent::EmptyInstallRemoved { dir } => {
                println!("Removed empty install directory: {}", dir.display());
            }
            StatusEvent::Finished { install_dir } => {
                println!("Finished unpacking into {}", install_dir.display());
            }
        }
    }
}

/// Status reporter that does nothing
#[derive(Debug, Default)]
pub struct NullStatusReporter;

impl StatusReporter for NullStatusReporter {
    fn on_event(&self, _event: &StatusEvent) {}
}
