//! Unit and end-to-end tests for the installation pipeline

use super::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sha1::{Digest, Sha1};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

use super::core::manifest::{EnvSupport, FileHashes};

/// Helper struct to capture status events during testing
#[derive(Debug, Default)]
struct StatusCapture {
    events: Arc<Mutex<Vec<StatusEvent>>>,
}

impl StatusCapture {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn callback(&self) -> StatusCallback {
        let events = self.events.clone();
        Arc::new(move |event| {
            events.lock().unwrap().push(event);
        })
    }

    fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap().clone()
    }

    fn count_matching(&self, predicate: impl Fn(&StatusEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Build a zip archive in memory from (entry name, content) pairs.
/// Entries with `None` content become directory entries.
fn build_zip(entries: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        match content {
            Some(bytes) => {
                writer.start_file(*name, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
            None => {
                writer.add_directory(*name, options).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

fn test_entry(entry_path: &str, url: &str, sha1: Option<String>) -> FileEntry {
    FileEntry {
        path: entry_path.to_string(),
        downloads: vec![url.to_string()],
        env: None,
        hashes: sha1.map(|digest| FileHashes {
            sha1: Some(digest),
            sha512: None,
        }),
        file_size: None,
    }
}

fn test_config(output_root: &Path) -> InstallConfig {
    InstallConfig::default().with_output_root(output_root)
}

#[cfg(test)]
mod mode_filter_tests {
    use super::*;

    fn entry_with_env(client: Option<&str>, server: Option<&str>) -> FileEntry {
        FileEntry {
            path: "mods/a.jar".to_string(),
            downloads: vec!["http://example.com/a.jar".to_string()],
            env: Some(EnvSupport {
                client: client.map(String::from),
                server: server.map(String::from),
            }),
            hashes: None,
            file_size: None,
        }
    }

    #[test]
    fn entry_without_env_always_applies() {
        let entry = test_entry("mods/a.jar", "http://example.com/a.jar", None);
        assert!(entry.applies_to(InstallMode::Client));
        assert!(entry.applies_to(InstallMode::Server));
    }

    #[test]
    fn server_unsupported_excluded_in_server_mode_only() {
        let entry = entry_with_env(Some("required"), Some("unsupported"));
        assert!(entry.applies_to(InstallMode::Client));
        assert!(!entry.applies_to(InstallMode::Server));
    }

    #[test]
    fn client_unsupported_excluded_in_client_mode_only() {
        let entry = entry_with_env(Some("unsupported"), Some("required"));
        assert!(!entry.applies_to(InstallMode::Client));
        assert!(entry.applies_to(InstallMode::Server));
    }

    #[test]
    fn required_and_optional_always_apply() {
        for client in ["required", "optional"] {
            for server in ["required", "optional"] {
                let entry = entry_with_env(Some(client), Some(server));
                assert!(entry.applies_to(InstallMode::Client));
                assert!(entry.applies_to(InstallMode::Server));
            }
        }
    }

    #[test]
    fn partial_env_only_excludes_marked_side() {
        let entry = entry_with_env(None, Some("unsupported"));
        assert!(entry.applies_to(InstallMode::Client));
        assert!(!entry.applies_to(InstallMode::Server));
    }
}

#[cfg(test)]
mod install_name_tests {
    use super::*;

    #[test]
    fn name_is_decoded_stem_of_last_segment() {
        let name = install_name("https://example.com/packs/My%20Pack%2B1.0.mrpack").unwrap();
        assert_eq!(name, "My Pack+1.0");
    }

    #[test]
    fn plain_name_keeps_only_extension_stripped() {
        let name = install_name("https://example.com/cool-pack.mrpack").unwrap();
        assert_eq!(name, "cool-pack");
    }

    #[test]
    fn url_without_path_falls_back() {
        let name = install_name("https://example.com/").unwrap();
        assert_eq!(name, "modpack");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = install_name("not a url");
        assert!(matches!(result, Err(InstallError::InvalidUrl { .. })));
    }
}

#[cfg(test)]
mod path_safety_tests {
    use super::*;

    #[test]
    fn plain_relative_paths_resolve() {
        let root = Path::new("/install");
        assert_eq!(
            resolve_inside(root, "mods/a.jar"),
            Some(PathBuf::from("/install/mods/a.jar"))
        );
    }

    #[test]
    fn parent_segments_are_rejected() {
        let root = Path::new("/install");
        assert_eq!(resolve_inside(root, "../evil.jar"), None);
        assert_eq!(resolve_inside(root, "mods/../../evil.jar"), None);
    }

    #[test]
    fn absolute_paths_are_rejected() {
        let root = Path::new("/install");
        assert_eq!(resolve_inside(root, "/etc/passwd"), None);
    }

    #[test]
    fn empty_path_is_rejected() {
        let root = Path::new("/install");
        assert_eq!(resolve_inside(root, ""), None);
        assert_eq!(resolve_inside(root, "."), None);
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;
    use super::super::extract::extract_archive;

    #[tokio::test]
    async fn extracts_entries_and_deletes_archive() {
        let temp = tempdir().unwrap();
        let archive_path = temp.path().join("pack.mrpack");
        let dest = temp.path().join("pack");

        let bytes = build_zip(&[
            ("modrinth.index.json", Some(b"{}".as_slice())),
            ("overrides", None),
            ("overrides/config/settings.txt", Some(b"key=value".as_slice())),
        ]);
        tokio::fs::write(&archive_path, &bytes).await.unwrap();

        extract_archive(&archive_path, &dest, None).await.unwrap();

        assert!(dest.join("modrinth.index.json").exists());
        assert!(dest.join("overrides/config/settings.txt").exists());
        // The archive is transient and deleted after successful extraction
        assert!(!archive_path.exists());
    }

    #[tokio::test]
    async fn escaping_entry_fails_with_zero_files_written() {
        let temp = tempdir().unwrap();
        let archive_path = temp.path().join("evil.mrpack");
        let dest = temp.path().join("evil");

        let bytes = build_zip(&[
            ("ok.txt", Some(b"fine".as_slice())),
            ("../escape.txt", Some(b"not fine".as_slice())),
        ]);
        tokio::fs::write(&archive_path, &bytes).await.unwrap();

        let result = extract_archive(&archive_path, &dest, None).await;

        match result.unwrap_err() {
            InstallError::ExtractionFailed { source, .. } => {
                assert!(matches!(source, ExtractionError::UnsafeEntry { .. }));
            }
            other => panic!("Expected ExtractionFailed, got {:?}", other),
        }
        // Nothing at all was written, and the archive is kept for diagnostics
        assert!(!dest.exists());
        assert!(!temp.path().join("escape.txt").exists());
        assert!(archive_path.exists());
    }
}

#[cfg(test)]
mod locator_tests {
    use super::*;

    #[test]
    fn shallowest_manifest_wins() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("nested/deeper")).unwrap();
        std::fs::write(temp.path().join("modrinth.index.json"), b"{}").unwrap();
        std::fs::write(temp.path().join("nested/deeper/modrinth.index.json"), b"{}").unwrap();

        let located = locate_pack(temp.path());
        assert_eq!(located.manifest, Some(temp.path().join("modrinth.index.json")));
    }

    #[test]
    fn equal_depth_breaks_ties_lexicographically() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("beta/overrides")).unwrap();
        std::fs::create_dir_all(temp.path().join("alpha/overrides")).unwrap();

        let located = locate_pack(temp.path());
        assert_eq!(located.overrides, Some(temp.path().join("alpha/overrides")));
    }

    #[test]
    fn empty_tree_locates_nothing() {
        let temp = tempdir().unwrap();
        let located = locate_pack(temp.path());
        assert!(located.is_empty());
    }
}

#[cfg(test)]
mod asset_downloader_tests {
    use super::*;

    #[tokio::test]
    async fn downloads_and_verifies_declared_sha1() {
        let server = MockServer::start().await;
        let content = b"mod file bytes";
        Mock::given(method("GET"))
            .and(path("/a.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.as_slice()))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        let entry = test_entry(
            "mods/a.jar",
            &format!("{}/a.jar", server.uri()),
            Some(sha1_hex(content)),
        );

        let capture = StatusCapture::new();
        let summary = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), Some(capture.callback()))
            .await;

        assert_eq!(summary.downloaded, 1);
        assert!(summary.failures.is_empty());
        let written = tokio::fs::read(temp.path().join("mods/a.jar")).await.unwrap();
        assert_eq!(written, content);
        assert_eq!(
            capture.count_matching(|e| matches!(e, StatusEvent::AssetDownloaded { .. })),
            1
        );
    }

    #[tokio::test]
    async fn existing_file_is_skipped_without_any_request() {
        let server = MockServer::start().await;

        let temp = tempdir().unwrap();
        let dest = temp.path().join("mods/a.jar");
        tokio::fs::create_dir_all(dest.parent().unwrap()).await.unwrap();
        tokio::fs::write(&dest, b"already here").await.unwrap();

        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        let entry = test_entry("mods/a.jar", &format!("{}/a.jar", server.uri()), None);

        let capture = StatusCapture::new();
        let summary = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), Some(capture.callback()))
            .await;

        assert_eq!(summary.skipped_existing, 1);
        assert_eq!(summary.downloaded, 0);
        assert!(summary.failures.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
        assert_eq!(
            capture.count_matching(|e| matches!(e, StatusEvent::AssetSkippedExisting { .. })),
            1
        );
    }

    #[tokio::test]
    async fn failed_download_is_reported_and_processing_continues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jar"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/present.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"present".as_slice()))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        let entries = vec![
            test_entry("mods/missing.jar", &format!("{}/missing.jar", server.uri()), None),
            test_entry("mods/present.jar", &format!("{}/present.jar", server.uri()), None),
        ];

        let summary = downloader.download_all(&entries, temp.path(), None).await;

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failures.len(), 1);
        match &summary.failures[0] {
            FileFailure::DownloadFailed { path, status } => {
                assert_eq!(path, "mods/missing.jar");
                assert_eq!(*status, 404);
            }
            other => panic!("Expected DownloadFailed, got {:?}", other),
        }
        assert!(!temp.path().join("mods/missing.jar").exists());
        assert!(temp.path().join("mods/present.jar").exists());
    }

    #[tokio::test]
    async fn hash_mismatch_is_reported_but_file_retained() {
        let server = MockServer::start().await;
        let served = b"actual bytes";
        Mock::given(method("GET"))
            .and(path("/a.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(served.as_slice()))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        // Digest of different content, as if one byte had been flipped
        let entry = test_entry(
            "mods/a.jar",
            &format!("{}/a.jar", server.uri()),
            Some(sha1_hex(b"expected bytes")),
        );

        let capture = StatusCapture::new();
        let summary = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), Some(capture.callback()))
            .await;

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failures.len(), 1);
        match &summary.failures[0] {
            FileFailure::HashMismatch { path, algorithm, expected, actual } => {
                assert_eq!(path, "mods/a.jar");
                assert_eq!(*algorithm, HashAlgorithm::Sha1);
                assert_eq!(expected, &sha1_hex(b"expected bytes"));
                assert_eq!(actual, &sha1_hex(served));
            }
            other => panic!("Expected HashMismatch, got {:?}", other),
        }
        // Retained-with-warning: the mismatched file stays on disk
        let written = tokio::fs::read(temp.path().join("mods/a.jar")).await.unwrap();
        assert_eq!(written, served);
    }

    #[tokio::test]
    async fn escaping_entry_path_is_a_per_file_failure() {
        let temp = tempdir().unwrap();
        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        let entry = test_entry("../outside.jar", "http://example.com/a.jar", None);

        let summary = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), None)
            .await;

        assert_eq!(summary.downloaded, 0);
        assert!(matches!(
            summary.failures.as_slice(),
            [FileFailure::UnsafePath { .. }]
        ));
    }

    #[tokio::test]
    async fn second_run_is_idempotent() {
        let server = MockServer::start().await;
        let content = b"stable bytes";
        Mock::given(method("GET"))
            .and(path("/a.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.as_slice()))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let downloader = AssetDownloader::new(&test_config(temp.path())).unwrap();
        let entry = test_entry("mods/a.jar", &format!("{}/a.jar", server.uri()), None);

        let first = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), None)
            .await;
        assert_eq!(first.downloaded, 1);
        let requests_after_first = server.received_requests().await.unwrap().len();

        let second = downloader
            .download_all(std::slice::from_ref(&entry), temp.path(), None)
            .await;
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(second.downloaded, 0);
        // No additional network traffic on the second run
        assert_eq!(server.received_requests().await.unwrap().len(), requests_after_first);
    }
}

#[cfg(test)]
mod override_merge_tests {
    use super::*;
    use super::super::overrides::merge_overrides;

    #[tokio::test]
    async fn merges_tree_and_deletes_source() {
        let temp = tempdir().unwrap();
        let overrides_dir = temp.path().join("pack/overrides");
        let target = temp.path().join("pack");
        std::fs::create_dir_all(overrides_dir.join("config")).unwrap();
        std::fs::write(overrides_dir.join("config/settings.txt"), b"a=1").unwrap();
        std::fs::write(overrides_dir.join("readme.txt"), b"hello").unwrap();

        let capture = StatusCapture::new();
        let merged = merge_overrides(&overrides_dir, &target, Some(capture.callback()))
            .await
            .unwrap();

        assert_eq!(merged, 2);
        assert_eq!(std::fs::read(target.join("config/settings.txt")).unwrap(), b"a=1");
        assert_eq!(std::fs::read(target.join("readme.txt")).unwrap(), b"hello");
        assert!(!overrides_dir.exists());
        assert_eq!(
            capture.count_matching(|e| matches!(e, StatusEvent::OverridesMerged { entries: 2 })),
            1
        );
    }

    #[tokio::test]
    async fn override_files_overwrite_existing_ones() {
        let temp = tempdir().unwrap();
        let overrides_dir = temp.path().join("pack/overrides");
        let target = temp.path().join("pack");
        std::fs::create_dir_all(overrides_dir.join("config")).unwrap();
        std::fs::create_dir_all(target.join("config")).unwrap();
        std::fs::write(overrides_dir.join("config/settings.txt"), b"new").unwrap();
        std::fs::write(target.join("config/settings.txt"), b"old").unwrap();
        std::fs::write(target.join("config/keep.txt"), b"keep").unwrap();

        merge_overrides(&overrides_dir, &target, None).await.unwrap();

        // Existing subtree preserved, individual file overwritten
        assert_eq!(std::fs::read(target.join("config/settings.txt")).unwrap(), b"new");
        assert_eq!(std::fs::read(target.join("config/keep.txt")).unwrap(), b"keep");
    }
}

#[cfg(test)]
mod cleanup_tests {
    use super::*;

    #[tokio::test]
    async fn manifest_is_removed() {
        let temp = tempdir().unwrap();
        let manifest = temp.path().join("modrinth.index.json");
        std::fs::write(&manifest, b"{}").unwrap();

        cleanup::remove_manifest(&manifest, None).await.unwrap();
        assert!(!manifest.exists());
    }

    #[tokio::test]
    async fn empty_install_dir_is_pruned() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("pack");
        std::fs::create_dir_all(&dir).unwrap();

        let removed = cleanup::prune_empty_install(&dir, None).await.unwrap();
        assert!(removed);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn populated_install_dir_is_kept() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("pack");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("mods.txt"), b"content").unwrap();

        let removed = cleanup::prune_empty_install(&dir, None).await.unwrap();
        assert!(!removed);
        assert!(dir.exists());
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    /// Mount the archive and return the pipeline source URL.
    async fn mount_archive(server: &MockServer, archive: Vec<u8>) -> String {
        Mock::given(method("GET"))
            .and(path("/pack.mrpack"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
            .mount(server)
            .await;
        format!("{}/pack.mrpack", server.uri())
    }

    fn manifest_json(asset_url: &str, sha1: &str, env: Option<&str>) -> String {
        let env_part = env
            .map(|block| format!(r#","env":{block}"#))
            .unwrap_or_default();
        format!(
            r#"{{"formatVersion":1,"game":"minecraft","versionId":"1.0","name":"Test Pack",
                "files":[{{"path":"mods/a.jar","downloads":["{asset_url}"],
                "hashes":{{"sha1":"{sha1}"}}{env_part}}}],
                "dependencies":{{"minecraft":"1.21"}}}}"#
        )
    }

    #[tokio::test]
    async fn client_mode_installs_declared_asset() {
        let server = MockServer::start().await;
        let content = b"known bytes";
        Mock::given(method("GET"))
            .and(path("/a.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.as_slice()))
            .mount(&server)
            .await;

        let manifest = manifest_json(&format!("{}/a.jar", server.uri()), &sha1_hex(content), None);
        let archive = build_zip(&[("modrinth.index.json", Some(manifest.as_bytes()))]);
        let url = mount_archive(&server, archive).await;

        let temp = tempdir().unwrap();
        let installer = Installer::new(test_config(temp.path())).unwrap();
        let capture = StatusCapture::new();

        let outcome = installer.install(&url, Some(capture.callback())).await.unwrap();

        let report = match outcome {
            InstallOutcome::Installed(report) => report,
            other => panic!("Expected Installed outcome, got {:?}", other),
        };
        assert_eq!(report.install_name, "pack");
        assert_eq!(report.downloaded, 1);
        assert!(report.is_complete());

        let install_dir = temp.path().join("pack");
        let written = tokio::fs::read(install_dir.join("mods/a.jar")).await.unwrap();
        assert_eq!(written, content);
        // Transient artifacts are gone
        assert!(!install_dir.join("modrinth.index.json").exists());
        assert!(!temp.path().join("pack.mrpack").exists());
        assert_eq!(
            capture.count_matching(|e| matches!(e, StatusEvent::Finished { .. })),
            1
        );
    }

    #[tokio::test]
    async fn server_mode_skips_unsupported_entry() {
        let server = MockServer::start().await;
        let content = b"client only";
        let manifest = manifest_json(
            &format!("{}/a.jar", server.uri()),
            &sha1_hex(content),
            Some(r#"{"client":"required","server":"unsupported"}"#),
        );
        let archive = build_zip(&[("modrinth.index.json", Some(manifest.as_bytes()))]);
        let url = mount_archive(&server, archive).await;

        let temp = tempdir().unwrap();
        let config = test_config(temp.path()).with_mode(InstallMode::Server);
        let installer = Installer::new(config).unwrap();
        let capture = StatusCapture::new();

        let outcome = installer.install(&url, Some(capture.callback())).await.unwrap();

        let report = match outcome {
            InstallOutcome::Installed(report) => report,
            other => panic!("Expected Installed outcome, got {:?}", other),
        };
        assert_eq!(report.skipped_unsupported, 1);
        assert_eq!(report.downloaded, 0);
        assert!(!temp.path().join("pack/mods/a.jar").exists());
        assert_eq!(
            capture.count_matching(|e| matches!(e, StatusEvent::AssetSkippedUnsupported { .. })),
            1
        );
        // Nothing was ever written, so the empty install directory is pruned
        assert!(!temp.path().join("pack").exists());
    }

    #[tokio::test]
    async fn overrides_are_merged_and_source_removed() {
        let server = MockServer::start().await;
        let archive = build_zip(&[
            ("overrides", None),
            ("overrides/config", None),
            ("overrides/config/settings.txt", Some(b"a=1".as_slice())),
        ]);
        let url = mount_archive(&server, archive).await;

        let temp = tempdir().unwrap();
        let installer = Installer::new(test_config(temp.path())).unwrap();

        let outcome = installer.install(&url, None).await.unwrap();

        let report = match outcome {
            InstallOutcome::Installed(report) => report,
            other => panic!("Expected Installed outcome, got {:?}", other),
        };
        assert!(report.overrides_merged);
        let install_dir = temp.path().join("pack");
        assert_eq!(
            std::fs::read(install_dir.join("config/settings.txt")).unwrap(),
            b"a=1"
        );
        assert!(!install_dir.join("overrides").exists());
    }

    #[tokio::test]
    async fn pack_without_manifest_or_overrides_reports_nothing_to_install() {
        let server = MockServer::start().await;
        let archive = build_zip(&[("readme.txt", Some(b"just a note".as_slice()))]);
        let url = mount_archive(&server, archive).await;

        let temp = tempdir().unwrap();
        let installer = Installer::new(test_config(temp.path())).unwrap();

        let outcome = installer.install(&url, None).await.unwrap();

        assert!(matches!(outcome, InstallOutcome::NothingToInstall { .. }));
        // Extracted content that is neither manifest nor overrides stays put
        assert!(temp.path().join("pack/readme.txt").exists());
    }

    #[tokio::test]
    async fn failed_archive_download_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pack.mrpack"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let installer = Installer::new(test_config(temp.path())).unwrap();

        let result = installer
            .install(&format!("{}/pack.mrpack", server.uri()), None)
            .await;

        match result.unwrap_err() {
            InstallError::DownloadFailed { status, .. } => assert_eq!(status, 500),
            other => panic!("Expected DownloadFailed, got {:?}", other),
        }
        assert!(!temp.path().join("pack").exists());
    }

    #[tokio::test]
    async fn partial_failure_still_returns_report() {
        let server = MockServer::start().await;
        let good = b"good bytes";
        Mock::given(method("GET"))
            .and(path("/good.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(good.as_slice()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad.jar"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let manifest = format!(
            r#"{{"files":[
                {{"path":"mods/good.jar","downloads":["{0}/good.jar"]}},
                {{"path":"mods/bad.jar","downloads":["{0}/bad.jar"]}}
            ]}}"#,
            server.uri()
        );
        let archive = build_zip(&[("modrinth.index.json", Some(manifest.as_bytes()))]);
        let url = mount_archive(&server, archive).await;

        let temp = tempdir().unwrap();
        let installer = Installer::new(test_config(temp.path())).unwrap();

        let outcome = installer.install(&url, None).await.unwrap();

        let report = match outcome {
            InstallOutcome::Installed(report) => report,
            other => panic!("Expected Installed outcome, got {:?}", other),
        };
        // Ran with 1 of 2 assets failing: distinguishable from not running at all
        assert_eq!(report.downloaded, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_complete());
        assert!(temp.path().join("pack/mods/good.jar").exists());
        // The manifest was still cleaned up after all entries were attempted
        assert!(!temp.path().join("pack/modrinth.index.json").exists());
    }
}
