//! Mojang launcher version manifest.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

use super::{PlatformVersion, VersionSource};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Manifest response types (internal).
mod api {
    use serde::Deserialize;

    use crate::versions::ReleaseType;

    #[derive(Deserialize, Debug)]
    pub struct Manifest {
        pub versions: Vec<Version>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Version {
        pub id: String,
        #[serde(rename = "type")]
        pub release_type: ReleaseType,
    }
}

/// Version source backed by the launcher manifest.
pub struct MojangManifest {
    http_client: HttpClient,
    manifest_url: String,
}

impl MojangManifest {
    pub fn new(http_client: HttpClient, manifest_url: Option<String>) -> Self {
        let manifest_url = manifest_url.unwrap_or_else(|| DEFAULT_MANIFEST_URL.to_string());
        Self {
            http_client,
            manifest_url,
        }
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }
}

#[async_trait]
impl VersionSource for MojangManifest {
    #[tracing::instrument(skip(self))]
    async fn fetch_versions(&self) -> Result<Vec<PlatformVersion>> {
        debug!("Fetching version manifest from {}...", self.manifest_url);

        let manifest: api::Manifest = self
            .http_client
            .get_json(&self.manifest_url)
            .await
            .context("Failed to fetch game version manifest")?;

        debug!("Manifest lists {} versions", manifest.versions.len());

        Ok(manifest
            .versions
            .into_iter()
            .map(|v| PlatformVersion::new(v.id, v.release_type))
            .collect())
    }
}
