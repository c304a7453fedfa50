//! Game version listing.
//!
//! A [`VersionSource`] supplies the known platform versions; a
//! [`VersionSelector`] turns them into the short list of options a user
//! picks the target version from.

mod mojang;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use crate::runlog::RunLog;

pub use mojang::{DEFAULT_MANIFEST_URL, MojangManifest};

/// Maximum number of versions offered for selection.
pub const VERSION_LIMIT: usize = 10;

/// Label of the placeholder option shown when the manifest cannot be loaded.
pub const UNAVAILABLE_LABEL: &str = "Failed to load versions";

/// Release channel of a platform version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    #[serde(other)]
    Other,
}

impl ReleaseType {
    /// Only full releases count as stable.
    pub fn is_stable(self) -> bool {
        self == ReleaseType::Release
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Release => write!(f, "release"),
            ReleaseType::Snapshot => write!(f, "snapshot"),
            ReleaseType::OldBeta => write!(f, "old_beta"),
            ReleaseType::OldAlpha => write!(f, "old_alpha"),
            ReleaseType::Other => write!(f, "other"),
        }
    }
}

/// A game release known to the version manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVersion {
    pub id: String,
    pub release_type: ReleaseType,
}

impl PlatformVersion {
    pub fn new(id: impl Into<String>, release_type: ReleaseType) -> Self {
        Self {
            id: id.into(),
            release_type,
        }
    }
}

/// Trait for version manifest sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetch every known version, newest first.
    async fn fetch_versions(&self) -> Result<Vec<PlatformVersion>>;
}

/// Keeps manifest order, drops pre-releases unless `include_snapshots` is
/// set, and truncates to `limit` entries.
pub fn select_versions(
    versions: Vec<PlatformVersion>,
    include_snapshots: bool,
    limit: usize,
) -> Vec<PlatformVersion> {
    versions
        .into_iter()
        .filter(|v| include_snapshots || v.release_type.is_stable())
        .take(limit)
        .collect()
}

/// One selectable entry. A placeholder has an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOption {
    pub value: String,
    pub label: String,
}

impl VersionOption {
    fn from_version(version: &PlatformVersion) -> Self {
        Self {
            value: version.id.clone(),
            label: version.id.clone(),
        }
    }

    fn unavailable() -> Self {
        Self {
            value: String::new(),
            label: UNAVAILABLE_LABEL.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// The list of target versions a user can choose from.
#[derive(Debug, Clone)]
pub struct VersionSelector {
    options: Vec<VersionOption>,
    limit: usize,
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionSelector {
    pub fn new() -> Self {
        Self::with_limit(VERSION_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            options: Vec::new(),
            limit,
        }
    }

    pub fn options(&self) -> &[VersionOption] {
        &self.options
    }

    /// The default choice: the first option that is not a placeholder.
    pub fn selected(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| !o.is_placeholder())
            .map(|o| o.value.as_str())
    }

    /// Re-fetches the manifest and replaces every option.
    ///
    /// A failed fetch never surfaces as an error: the options collapse to a
    /// single placeholder and the failure is written to `log`.
    #[tracing::instrument(skip(self, source, log))]
    pub async fn refresh<S: VersionSource + ?Sized>(
        &mut self,
        source: &S,
        include_snapshots: bool,
        log: &mut RunLog,
    ) {
        match source.fetch_versions().await {
            Ok(versions) => {
                let selected = select_versions(versions, include_snapshots, self.limit);
                self.options = selected.iter().map(VersionOption::from_version).collect();
                log.info(format!("Loaded {} game versions", self.options.len()));
            }
            Err(e) => {
                self.options = vec![VersionOption::unavailable()];
                log.error(format!("Failed to fetch game versions: {:#}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Vec<PlatformVersion> {
        vec![
            PlatformVersion::new("1.21", ReleaseType::Release),
            PlatformVersion::new("1.21-snapshot", ReleaseType::Snapshot),
            PlatformVersion::new("1.20.4", ReleaseType::Release),
        ]
    }

    fn values(selector: &VersionSelector) -> Vec<&str> {
        selector.options().iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn test_release_type_parse() {
        let t: ReleaseType = serde_json::from_str(r#""release""#).unwrap();
        assert_eq!(t, ReleaseType::Release);
        let t: ReleaseType = serde_json::from_str(r#""old_alpha""#).unwrap();
        assert_eq!(t, ReleaseType::OldAlpha);
        let t: ReleaseType = serde_json::from_str(r#""experiment""#).unwrap();
        assert_eq!(t, ReleaseType::Other);
    }

    #[test]
    fn test_only_release_is_stable() {
        assert!(ReleaseType::Release.is_stable());
        assert!(!ReleaseType::Snapshot.is_stable());
        assert!(!ReleaseType::OldBeta.is_stable());
        assert!(!ReleaseType::Other.is_stable());
        assert_eq!(ReleaseType::OldBeta.to_string(), "old_beta");
    }

    #[test]
    fn test_select_versions_stable_only() {
        let selected = select_versions(manifest(), false, VERSION_LIMIT);
        let ids: Vec<&str> = selected.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1.21", "1.20.4"]);
    }

    #[test]
    fn test_select_versions_with_snapshots() {
        let selected = select_versions(manifest(), true, VERSION_LIMIT);
        let ids: Vec<&str> = selected.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1.21", "1.21-snapshot", "1.20.4"]);
    }

    #[test]
    fn test_select_versions_limit_applies_after_filter() {
        let mut versions = Vec::new();
        for i in 0..15 {
            versions.push(PlatformVersion::new(format!("s{}", i), ReleaseType::Snapshot));
            versions.push(PlatformVersion::new(format!("r{}", i), ReleaseType::Release));
        }

        let selected = select_versions(versions, false, VERSION_LIMIT);
        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0].id, "r0");
        assert_eq!(selected[9].id, "r9");
    }

    #[tokio::test]
    async fn test_refresh_populates_options() {
        let mut source = MockVersionSource::new();
        source
            .expect_fetch_versions()
            .times(1)
            .returning(|| Ok(manifest()));

        let mut log = RunLog::new();
        let mut selector = VersionSelector::new();
        selector.refresh(&source, false, &mut log).await;

        assert_eq!(values(&selector), vec!["1.21", "1.20.4"]);
        assert_eq!(selector.options()[0].label, "1.21");
        assert_eq!(selector.selected(), Some("1.21"));
        assert!(log.contains("Loaded 2 game versions"));
    }

    #[tokio::test]
    async fn test_refresh_replaces_previous_options() {
        let mut source = MockVersionSource::new();
        source
            .expect_fetch_versions()
            .times(2)
            .returning(|| Ok(manifest()));

        let mut log = RunLog::new();
        let mut selector = VersionSelector::new();
        selector.refresh(&source, true, &mut log).await;
        assert_eq!(selector.options().len(), 3);

        // Toggling the filter rebuilds the whole list from a fresh fetch
        selector.refresh(&source, false, &mut log).await;
        assert_eq!(values(&selector), vec!["1.21", "1.20.4"]);
    }

    #[test_log::test(tokio::test)]
    async fn test_refresh_failure_shows_placeholder() {
        let mut source = MockVersionSource::new();
        source
            .expect_fetch_versions()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let mut log = RunLog::new();
        let mut selector = VersionSelector::new();
        selector.refresh(&source, false, &mut log).await;

        assert_eq!(selector.options().len(), 1);
        assert!(selector.options()[0].is_placeholder());
        assert_eq!(selector.options()[0].label, UNAVAILABLE_LABEL);
        assert_eq!(selector.selected(), None);
        assert!(log.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_refresh_respects_custom_limit() {
        let mut source = MockVersionSource::new();
        source
            .expect_fetch_versions()
            .returning(|| Ok(manifest()));

        let mut log = RunLog::new();
        let mut selector = VersionSelector::with_limit(1);
        selector.refresh(&source, true, &mut log).await;

        assert_eq!(values(&selector), vec!["1.21"]);
    }
}
