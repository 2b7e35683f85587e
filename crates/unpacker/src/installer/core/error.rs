//! Error types for the installation pipeline
//!
//! Errors come in two tiers. `InstallError` is fatal: the run stops and the
//! error propagates out of the pipeline entry point. `FileFailure` is
//! per-item: it is reported through the status channel, accumulated into the
//! final report, and never aborts the remaining entries.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort the whole pipeline run
#[derive(Error, Debug)]
pub enum InstallError {
    /// The archive request completed with a non-success status
    #[error("failed to download archive from '{url}' (HTTP {status})")]
    DownloadFailed { url: String, status: u16 },

    /// The archive request could not be completed at all
    #[error("request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client itself could not be constructed
    #[error("failed to construct HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Archive extraction failed; the archive file is left in place
    #[error("failed to extract archive '{archive}'")]
    ExtractionFailed {
        archive: PathBuf,
        #[source]
        source: ExtractionError,
    },

    /// The manifest file exists but could not be parsed
    #[error("failed to parse manifest '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File system I/O errors with file context
    #[error("file operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// The source URL could not be parsed
    #[error("invalid source URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A background task was cancelled or panicked
    #[error("background task failed to complete")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Causes of a failed extraction
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An entry would resolve outside the destination directory
    #[error("archive entry '{name}' escapes the destination directory")]
    UnsafeEntry { name: String },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Delete,
    CreateDir,
    Metadata,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Delete => write!(f, "deleting"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::Metadata => write!(f, "reading metadata"),
        }
    }
}

/// Hash algorithms a manifest entry may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha512,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha1 => write!(f, "sha1"),
            HashAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

/// Per-file failures accumulated during asset resolution
///
/// These carry the manifest-relative path rather than an absolute one so a
/// caller can correlate them with manifest entries.
#[derive(Error, Debug, Clone)]
pub enum FileFailure {
    /// The asset request completed with a non-success status
    #[error("failed to download '{path}' (HTTP {status})")]
    DownloadFailed { path: String, status: u16 },

    /// The asset request could not be completed at all
    #[error("request for '{path}' failed: {error}")]
    Request { path: String, error: String },

    /// Downloaded content does not match the declared digest; the file is
    /// retained on disk
    #[error("{algorithm} mismatch for '{path}': expected {expected}, got {actual}")]
    HashMismatch {
        path: String,
        algorithm: HashAlgorithm,
        expected: String,
        actual: String,
    },

    /// The manifest-declared path resolves outside the install directory
    #[error("entry path '{path}' escapes the install directory")]
    UnsafePath { path: String },

    /// The entry declares no download URL
    #[error("entry '{path}' has no download URL")]
    MissingDownloadUrl { path: String },

    /// Local I/O failed while writing the asset
    #[error("I/O error for '{path}': {error}")]
    Io { path: String, error: String },
}

impl FileFailure {
    /// Manifest-relative path of the entry this failure belongs to
    pub fn path(&self) -> &str {
        match self {
            FileFailure::DownloadFailed { path, .. }
            | FileFailure::Request { path, .. }
            | FileFailure::HashMismatch { path, .. }
            | FileFailure::UnsafePath { path }
            | FileFailure::MissingDownloadUrl { path }
            | FileFailure::Io { path, .. } => path,
        }
    }

    /// Whether the asset ended up on disk despite the failure
    pub fn file_retained(&self) -> bool {
        matches!(self, FileFailure::HashMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
