//! Manifest and overrides location
//!
//! A pack may nest its content under an arbitrary leading directory, so the
//! locator walks the whole extracted tree. When several candidates exist the
//! choice is deterministic: the shallowest path wins, remaining ties break
//! lexicographically.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Well-known manifest filename inside a pack archive
pub const MANIFEST_FILE_NAME: &str = "modrinth.index.json";

/// Well-known overrides directory name inside a pack archive
pub const OVERRIDES_DIR_NAME: &str = "overrides";

/// What the locator found in the extracted tree
#[derive(Debug, Default)]
pub struct LocatedPack {
    pub manifest: Option<PathBuf>,
    pub overrides: Option<PathBuf>,
}

impl LocatedPack {
    /// Neither a manifest nor overrides: there is nothing to install.
    pub fn is_empty(&self) -> bool {
        self.manifest.is_none() && self.overrides.is_none()
    }
}

/// Walk `root` and pick the manifest file and overrides directory.
pub fn locate_pack(root: &Path) -> LocatedPack {
    let mut manifests: Vec<(usize, PathBuf)> = Vec::new();
    let mut overrides: Vec<(usize, PathBuf)> = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME {
            manifests.push((entry.depth(), entry.into_path()));
        } else if entry.file_type().is_dir() && entry.file_name() == OVERRIDES_DIR_NAME {
            overrides.push((entry.depth(), entry.into_path()));
        }
    }

    let located = LocatedPack {
        manifest: pick_candidate(manifests),
        overrides: pick_candidate(overrides),
    };
    debug!(
        "Located manifest={:?} overrides={:?} under {}",
        located.manifest,
        located.overrides,
        root.display()
    );
    located
}

fn pick_candidate(mut candidates: Vec<(usize, PathBuf)>) -> Option<PathBuf> {
    candidates.sort_by(|(depth_a, path_a), (depth_b, path_b)| {
        depth_a.cmp(depth_b).then_with(|| path_a.cmp(path_b))
    });
    candidates.into_iter().next().map(|(_, path)| path)
}
