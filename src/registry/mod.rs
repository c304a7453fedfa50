//! Package registry abstraction.
//!
//! The resolver only needs two lookups from a registry: a free-text project
//! search and the release list of one project.

mod modrinth;

use anyhow::Result;
use async_trait::async_trait;

pub use modrinth::{DEFAULT_API_URL, ModrinthRegistry, PROJECT_TYPE_FACET};

/// Loader every release query is filtered by.
pub const LOADER: &str = "fabric";

/// A project returned by a registry search, best match first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub slug: String,
    pub project_id: String,
    pub title: String,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,
    pub primary: bool,
}

/// A release of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion {
    pub id: String,
    /// Version string as published (e.g., "mc1.21-0.5.11")
    pub version_number: String,
    pub files: Vec<VersionFile>,
}

/// Trait for package registries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Search mod projects by free text.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// List a project's releases compatible with `game_version` and `loader`,
    /// newest first.
    async fn project_versions(
        &self,
        slug: &str,
        game_version: &str,
        loader: &str,
    ) -> Result<Vec<ProjectVersion>>;
}
