//! Installation pipeline orchestration
//!
//! One `Installer` drives the full sequence for a source URL: fetch the
//! archive, extract it, locate the manifest and overrides, resolve assets
//! for the configured mode, merge overrides, clean up. Fetch, extraction
//! and the empty-pack condition are fatal; everything per-file is
//! accumulated into the returned report. The override merge runs strictly
//! after asset resolution, so the two never write into the same subtree
//! concurrently.

use tokio::fs;
use tokio::task;
use tracing::info;

use super::assets::AssetDownloader;
use super::cleanup;
use super::config::InstallConfig;
use super::core::error::{FileOperation, InstallError, Result};
use super::core::{
    InstallOutcome, InstallReport, StatusCallback, StatusEvent, install_name,
};
use super::extract::extract_archive;
use super::fetch::ArchiveFetcher;
use super::locate::{LocatedPack, locate_pack};
use super::overrides::merge_overrides;

/// Archive file extension used for the transient local copy
const ARCHIVE_EXTENSION: &str = "mrpack";

/// Manifest-driven modpack installer
pub struct Installer {
    config: InstallConfig,
    fetcher: ArchiveFetcher,
    assets: AssetDownloader,
}

impl Installer {
    pub fn new(config: InstallConfig) -> Result<Self> {
        let fetcher = ArchiveFetcher::new(&config)?;
        let assets = AssetDownloader::new(&config)?;
        Ok(Self {
            config,
            fetcher,
            assets,
        })
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Run the whole pipeline for `source_url`.
    ///
    /// Returns `Err` only for fatal conditions; a run that completed with
    /// per-file failures still returns `Ok(Installed(report))` with those
    /// failures listed.
    pub async fn install(
        &self,
        source_url: &str,
        status_callback: Option<StatusCallback>,
    ) -> Result<InstallOutcome> {
        let name = install_name(source_url)?;
        let install_dir = self.config.output_root.join(&name);
        let archive_path = self
            .config
            .output_root
            .join(format!("{name}.{ARCHIVE_EXTENSION}"));
        info!("Installing '{}' into {}", name, install_dir.display());

        fs::create_dir_all(&self.config.output_root)
            .await
            .map_err(|source| InstallError::FileSystem {
                path: self.config.output_root.clone(),
                operation: FileOperation::CreateDir,
                source,
            })?;

        self.fetcher
            .fetch(source_url, &archive_path, status_callback.clone())
            .await?;
        extract_archive(&archive_path, &install_dir, status_callback.clone()).await?;

        let located = {
            let root = install_dir.clone();
            task::spawn_blocking(move || locate_pack(&root))
                .await
                .map_err(|source| InstallError::Task { source })?
        };

        if located.is_empty() {
            info!("No manifest or overrides found, nothing to install");
            cleanup::prune_empty_install(&install_dir, status_callback).await?;
            return Ok(InstallOutcome::NothingToInstall { install_dir });
        }

        let mut report = InstallReport {
            install_name: name,
            install_dir: install_dir.clone(),
            ..Default::default()
        };

        self.resolve_assets(&located, &mut report, &status_callback)
            .await?;

        if let Some(overrides_path) = &located.overrides {
            if let Some(ref callback) = status_callback {
                callback(StatusEvent::OverridesLocated {
                    path: overrides_path.clone(),
                });
            }
            merge_overrides(overrides_path, &install_dir, status_callback.clone()).await?;
            report.overrides_merged = true;
        }

        if let Some(manifest_path) = &located.manifest {
            cleanup::remove_manifest(manifest_path, status_callback.clone()).await?;
        }
        cleanup::prune_empty_install(&install_dir, status_callback.clone()).await?;

        if let Some(ref callback) = status_callback {
            callback(StatusEvent::Finished {
                install_dir: install_dir.clone(),
            });
        }
        Ok(InstallOutcome::Installed(report))
    }

    async fn resolve_assets(
        &self,
        located: &LocatedPack,
        report: &mut InstallReport,
        status_callback: &Option<StatusCallback>,
    ) -> Result<()> {
        let Some(manifest_path) = &located.manifest else {
            return Ok(());
        };

        if let Some(callback) = status_callback {
            callback(StatusEvent::ManifestLocated {
                path: manifest_path.clone(),
            });
        }

        let manifest = super::core::PackManifest::load(manifest_path).await?;
        info!(
            "Manifest '{}' declares {} files",
            manifest.name,
            manifest.files.len()
        );

        let mut included = Vec::with_capacity(manifest.files.len());
        for entry in manifest.files {
            if entry.applies_to(self.config.mode) {
                included.push(entry);
            } else {
                if let Some(callback) = status_callback {
                    callback(StatusEvent::AssetSkippedUnsupported {
                        path: entry.path.clone(),
                    });
                }
                report.skipped_unsupported += 1;
            }
        }

        let summary = self
            .assets
            .download_all(&included, &report.install_dir, status_callback.clone())
            .await;
        report.downloaded = summary.downloaded;
        report.skipped_existing = summary.skipped_existing;
        report.failures = summary.failures;
        Ok(())
    }
}
