//! Pack manifest schema and mode filtering
//!
//! The manifest is a JSON document named `modrinth.index.json` with a `files`
//! array describing every downloadable asset of the pack. Keys are camelCase.
//! Unknown fields are tolerated so newer manifests keep parsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::InstallMode;
use super::error::{InstallError, Result};

/// Env value marking an entry inapplicable to a mode
const UNSUPPORTED: &str = "unsupported";

/// Top-level manifest document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackManifest {
    #[serde(default)]
    pub format_version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version_id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Loader/game version requirements, e.g. "minecraft" or "fabric-loader"
    #[serde(default)]
    pub dependencies: HashMap<String, String>,
}

/// One downloadable file declared by the manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Slash-separated path relative to the install directory
    pub path: String,
    /// Candidate URLs; only the first is ever used
    pub downloads: Vec<String>,
    #[serde(default)]
    pub env: Option<EnvSupport>,
    #[serde(default)]
    pub hashes: Option<FileHashes>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Per-mode applicability declared by an entry
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSupport {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
}

/// Expected content digests, hex-encoded
#[derive(Debug, Clone, Deserialize)]
pub struct FileHashes {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub sha512: Option<String>,
}

impl PackManifest {
    /// Load and parse a manifest from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| InstallError::FileSystem {
                path: path.to_path_buf(),
                operation: super::error::FileOperation::Read,
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| InstallError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FileEntry {
    /// Mode filter: whether this entry applies to the given install mode.
    ///
    /// An entry is excluded only when its env explicitly marks the active
    /// mode as unsupported; entries without an env object always apply.
    pub fn applies_to(&self, mode: InstallMode) -> bool {
        let Some(env) = &self.env else {
            return true;
        };
        let support = match mode {
            InstallMode::Client => env.client.as_deref(),
            InstallMode::Server => env.server.as_deref(),
        };
        support != Some(UNSUPPORTED)
    }

    /// The URL that will actually be fetched
    pub fn primary_url(&self) -> Option<&str> {
        self.downloads.first().map(String::as_str)
    }

    /// Resolve the on-disk destination for this entry, strictly inside `root`.
    ///
    /// Returns `None` when the declared path escapes the install directory
    /// (absolute paths, parent-directory segments) or names the root itself.
    pub fn resolve_destination(&self, root: &Path) -> Option<PathBuf> {
        resolve_inside(root, &self.path)
    }
}

/// Join a slash-separated relative path onto `root`, rejecting any component
/// that would escape it.
pub fn resolve_inside(root: &Path, relative: &str) -> Option<PathBuf> {
    use std::path::Component;

    let mut resolved = root.to_path_buf();
    let mut pushed = false;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            // ParentDir, RootDir and prefixes all escape the tree
            _ => return None,
        }
    }
    pushed.then_some(resolved)
}
