//! Catalog collaborator client
//!
//! Thin typed client for the remote pack catalog: text search over published
//! packs and resolution of a pack identifier to the download URL of its
//! newest archive. The installation pipeline never parses catalog responses
//! itself - it only consumes the resolved URL this module hands back.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::installer::InstallConfig;

/// Default catalog API base URL
pub const DEFAULT_CATALOG_URL: &str = "https://api.modrinth.com/v2";

/// Project type the search is filtered down to
const PROJECT_TYPE_MODPACK: &str = "modpack";

/// Errors from catalog lookups
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to construct HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("project '{project_id}' has no downloadable versions")]
    NoVersions { project_id: String },
}

/// One pack returned by a catalog search
#[derive(Debug, Clone, Deserialize)]
pub struct PackHit {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub project_type: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<PackHit>,
}

#[derive(Debug, Deserialize)]
struct ProjectVersion {
    #[serde(default)]
    files: Vec<VersionFile>,
}

#[derive(Debug, Deserialize)]
struct VersionFile {
    url: String,
    #[serde(default)]
    primary: bool,
}

/// Client for the pack catalog's search and version-lookup endpoints
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &InstallConfig) -> Result<Self, CatalogError> {
        Self::with_base_url(config, DEFAULT_CATALOG_URL)
    }

    /// Point the client at a different catalog endpoint (used by tests).
    pub fn with_base_url<S: Into<String>>(
        config: &InstallConfig,
        base_url: S,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|source| CatalogError::Client { source })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Search the catalog, keeping only modpack results.
    pub async fn search(&self, query: &str) -> Result<Vec<PackHit>, CatalogError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|source| CatalogError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body: SearchResponse =
            response
                .json()
                .await
                .map_err(|source| CatalogError::Request {
                    url: url.clone(),
                    source,
                })?;

        let hits: Vec<PackHit> = body
            .hits
            .into_iter()
            .filter(|hit| hit.project_type == PROJECT_TYPE_MODPACK)
            .collect();
        debug!("Catalog search '{}' returned {} packs", query, hits.len());
        Ok(hits)
    }

    /// Resolve a project identifier to the download URL of its latest archive.
    ///
    /// Versions are returned newest-first; within a version the primary file
    /// wins, falling back to the first listed file.
    pub async fn latest_pack_url(&self, project_id: &str) -> Result<String, CatalogError> {
        let url = format!("{}/project/{}/version", self.base_url, project_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| CatalogError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let versions: Vec<ProjectVersion> =
            response
                .json()
                .await
                .map_err(|source| CatalogError::Request {
                    url: url.clone(),
                    source,
                })?;

        versions
            .into_iter()
            .find(|version| !version.files.is_empty())
            .and_then(|version| {
                let primary = version.files.iter().position(|file| file.primary);
                let index = primary.unwrap_or(0);
                version.files.into_iter().nth(index).map(|file| file.url)
            })
            .ok_or_else(|| CatalogError::NoVersions {
                project_id: project_id.to_string(),
            })
    }

    /// Fetch a pack's icon as raw bytes for a caller-side renderer.
    pub async fn fetch_icon(&self, icon_url: &str) -> Result<Vec<u8>, CatalogError> {
        let response =
            self.client
                .get(icon_url)
                .send()
                .await
                .map_err(|source| CatalogError::Request {
                    url: icon_url.to_string(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: icon_url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Request {
                url: icon_url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}
