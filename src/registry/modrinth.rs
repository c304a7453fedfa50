//! Modrinth registry implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{ProjectVersion, Registry, SearchHit, VersionFile};

pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";

/// Search facet restricting results to mods.
pub const PROJECT_TYPE_FACET: &str = r#"[["project_type:mod"]]"#;

/// Modrinth API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct SearchResults {
        #[serde(default)]
        pub hits: Vec<Hit>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Hit {
        pub slug: String,
        #[serde(default)]
        pub project_id: String,
        #[serde(default)]
        pub title: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Version {
        #[serde(default)]
        pub id: String,
        #[serde(default)]
        pub version_number: String,
        #[serde(default)]
        pub files: Vec<File>,
    }

    #[derive(Deserialize, Debug)]
    pub struct File {
        pub url: String,
        pub filename: String,
        #[serde(default)]
        pub primary: bool,
    }
}

/// Modrinth registry client.
pub struct ModrinthRegistry {
    http_client: HttpClient,
    api_url: String,
}

impl ModrinthRegistry {
    pub fn new(http_client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Registry for ModrinthRegistry {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.api_url);
        debug!("Searching {} for {:?}...", url, query);

        let results: api::SearchResults = self
            .http_client
            .get_json_with_query(&url, &[("query", query), ("facets", PROJECT_TYPE_FACET)])
            .await
            .with_context(|| format!("Failed to search registry for {:?}", query))?;

        Ok(results.hits.into_iter().map(|h| h.into()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn project_versions(
        &self,
        slug: &str,
        game_version: &str,
        loader: &str,
    ) -> Result<Vec<ProjectVersion>> {
        let url = format!("{}/project/{}/version", self.api_url, slug);
        let game_versions = serde_json::json!([game_version]).to_string();
        let loaders = serde_json::json!([loader]).to_string();
        debug!("Fetching versions of {} from {}...", slug, url);

        let versions: Vec<api::Version> = self
            .http_client
            .get_json_with_query(
                &url,
                &[
                    ("game_versions", game_versions.as_str()),
                    ("loaders", loaders.as_str()),
                ],
            )
            .await
            .with_context(|| format!("Failed to fetch versions of {}", slug))?;

        Ok(versions.into_iter().map(|v| v.into()).collect())
    }
}

impl From<api::Hit> for SearchHit {
    fn from(h: api::Hit) -> Self {
        SearchHit {
            slug: h.slug,
            project_id: h.project_id,
            title: h.title,
        }
    }
}

impl From<api::Version> for ProjectVersion {
    fn from(v: api::Version) -> Self {
        ProjectVersion {
            id: v.id,
            version_number: v.version_number,
            files: v.files.into_iter().map(|f| f.into()).collect(),
        }
    }
}

impl From<api::File> for VersionFile {
    fn from(f: api::File) -> Self {
        VersionFile {
            url: f.url,
            filename: f.filename,
            primary: f.primary,
        }
    }
}
