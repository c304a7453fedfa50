//! Matching discovered mods against the registry.

use anyhow::{Context, Result};
use log::debug;

use crate::inspect::ModDescriptor;
use crate::registry::{LOADER, Registry};
use crate::runlog::RunLog;

/// A file chosen to replace one of the uploaded mods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub url: String,
    pub filename: String,
    /// Identifier of the mod this file replaces.
    pub mod_id: String,
}

/// Resolves mods to downloadable files, one registry request at a time.
pub struct Resolver<'a, G: Registry + ?Sized> {
    registry: &'a G,
}

impl<'a, G: Registry + ?Sized> Resolver<'a, G> {
    pub fn new(registry: &'a G) -> Self {
        Self { registry }
    }

    /// Resolves every mod in order.
    ///
    /// Mods with no search hit, no compatible release or no file are left
    /// out of the result. Any request failure aborts the whole pass.
    #[tracing::instrument(skip(self, mods, log))]
    pub async fn resolve_all(
        &self,
        mods: &[ModDescriptor],
        target_version: &str,
        log: &mut RunLog,
    ) -> Result<Vec<ResolvedAsset>> {
        let mut assets = Vec::new();

        for descriptor in mods {
            let resolved = self
                .resolve(descriptor, target_version, log)
                .await
                .with_context(|| format!("Failed to resolve {}", descriptor.id))?;

            if let Some(asset) = resolved {
                assets.push(asset);
            }
        }

        log.info(format!(
            "Resolved {} of {} mods for {}",
            assets.len(),
            mods.len(),
            target_version
        ));
        Ok(assets)
    }

    /// Resolves a single mod. The first search hit is taken as the match.
    pub async fn resolve(
        &self,
        descriptor: &ModDescriptor,
        target_version: &str,
        log: &mut RunLog,
    ) -> Result<Option<ResolvedAsset>> {
        let hits = self.registry.search(&descriptor.name).await?;
        let Some(hit) = hits.into_iter().next() else {
            log.info(format!("{}: not found in registry", descriptor.name));
            return Ok(None);
        };
        debug!("{} matched project {}", descriptor.name, hit.slug);

        let versions = self
            .registry
            .project_versions(&hit.slug, target_version, LOADER)
            .await?;
        let Some(version) = versions.into_iter().next() else {
            log.info(format!(
                "{}: no {} release for {}",
                descriptor.name, LOADER, target_version
            ));
            return Ok(None);
        };

        let Some(file) = version.files.into_iter().next() else {
            log.info(format!(
                "{}: release {} has no files",
                descriptor.name, version.version_number
            ));
            return Ok(None);
        };

        log.info(format!(
            "{}: {} -> {}",
            descriptor.name, descriptor.version, file.filename
        ));
        Ok(Some(ResolvedAsset {
            url: file.url,
            filename: file.filename,
            mod_id: descriptor.id.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MockRegistry, ProjectVersion, SearchHit, VersionFile};
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn descriptor(id: &str, name: &str) -> ModDescriptor {
        ModDescriptor {
            id: id.into(),
            version: "0.5".into(),
            name: name.into(),
            description: "...".into(),
            archive_entry: format!("{}.jar", id),
        }
    }

    fn hit(slug: &str) -> SearchHit {
        SearchHit {
            slug: slug.into(),
            project_id: format!("id-{}", slug),
            title: slug.into(),
        }
    }

    fn release(files: &[(&str, &str)]) -> ProjectVersion {
        ProjectVersion {
            id: "v".into(),
            version_number: "1.0".into(),
            files: files
                .iter()
                .map(|(url, filename)| VersionFile {
                    url: url.to_string(),
                    filename: filename.to_string(),
                    primary: true,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_resolve_sodium() {
        let mut registry = MockRegistry::new();
        registry
            .expect_search()
            .with(eq("Sodium"))
            .times(1)
            .returning(|_| Ok(vec![hit("sodium-fabric")]));
        registry
            .expect_project_versions()
            .with(eq("sodium-fabric"), eq("1.21"), eq("fabric"))
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![release(&[(
                    "https://x/sodium-1.21.jar",
                    "sodium-1.21.jar",
                )])])
            });

        let mut log = RunLog::new();
        let assets = Resolver::new(&registry)
            .resolve_all(&[descriptor("sodium", "Sodium")], "1.21", &mut log)
            .await
            .unwrap();

        assert_eq!(
            assets,
            vec![ResolvedAsset {
                url: "https://x/sodium-1.21.jar".into(),
                filename: "sodium-1.21.jar".into(),
                mod_id: "sodium".into(),
            }]
        );
        assert!(log.contains("Resolved 1 of 1 mods for 1.21"));
    }

    #[tokio::test]
    async fn test_first_hit_and_first_file_win() {
        let mut registry = MockRegistry::new();
        registry
            .expect_search()
            .returning(|_| Ok(vec![hit("first"), hit("second")]));
        registry
            .expect_project_versions()
            .with(eq("first"), eq("1.21"), eq("fabric"))
            .returning(|_, _, _| {
                Ok(vec![
                    release(&[("https://x/a.jar", "a.jar"), ("https://x/b.jar", "b.jar")]),
                    release(&[("https://x/old.jar", "old.jar")]),
                ])
            });

        let mut log = RunLog::new();
        let asset = Resolver::new(&registry)
            .resolve(&descriptor("m", "M"), "1.21", &mut log)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(asset.filename, "a.jar");
    }

    #[tokio::test]
    async fn test_no_search_hit_drops_only_that_mod() {
        let mut registry = MockRegistry::new();
        registry.expect_search().returning(|query| match query {
            "Unknown Mod" => Ok(vec![]),
            _ => Ok(vec![hit("lithium")]),
        });
        registry
            .expect_project_versions()
            .with(eq("lithium"), eq("1.21"), eq("fabric"))
            .times(1)
            .returning(|_, _, _| Ok(vec![release(&[("https://x/l.jar", "l.jar")])]));

        let mods = [descriptor("unknown", "Unknown Mod"), descriptor("lithium", "Lithium")];
        let mut log = RunLog::new();
        let assets = Resolver::new(&registry)
            .resolve_all(&mods, "1.21", &mut log)
            .await
            .unwrap();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].mod_id, "lithium");
        assert!(log.contains("Unknown Mod: not found in registry"));
    }

    #[tokio::test]
    async fn test_no_compatible_release_drops_mod() {
        let mut registry = MockRegistry::new();
        registry
            .expect_search()
            .returning(|_| Ok(vec![hit("old-mod")]));
        registry
            .expect_project_versions()
            .returning(|_, _, _| Ok(vec![]));

        let mut log = RunLog::new();
        let assets = Resolver::new(&registry)
            .resolve_all(&[descriptor("old", "Old Mod")], "1.21", &mut log)
            .await
            .unwrap();

        assert!(assets.is_empty());
        assert!(log.contains("no fabric release for 1.21"));
    }

    #[tokio::test]
    async fn test_release_without_files_drops_mod() {
        let mut registry = MockRegistry::new();
        registry.expect_search().returning(|_| Ok(vec![hit("empty")]));
        registry
            .expect_project_versions()
            .returning(|_, _, _| Ok(vec![release(&[])]));

        let mut log = RunLog::new();
        let asset = Resolver::new(&registry)
            .resolve(&descriptor("e", "Empty"), "1.21", &mut log)
            .await
            .unwrap();

        assert_eq!(asset, None);
    }

    #[tokio::test]
    async fn test_request_failure_aborts_remaining_mods() {
        let mut seq = Sequence::new();
        let mut registry = MockRegistry::new();
        registry
            .expect_search()
            .with(eq("First"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("connection reset")));
        // "Second" must never be searched
        registry.expect_search().with(eq("Second")).never();

        let mods = [descriptor("first", "First"), descriptor("second", "Second")];
        let mut log = RunLog::new();
        let err = Resolver::new(&registry)
            .resolve_all(&mods, "1.21", &mut log)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to resolve first"));
        assert!(format!("{:#}", err).contains("connection reset"));
    }

    #[tokio::test]
    async fn test_no_mods_means_no_requests() {
        let registry = MockRegistry::new();

        let mut log = RunLog::new();
        let assets = Resolver::new(&registry)
            .resolve_all(&[], "1.21", &mut log)
            .await
            .unwrap();

        assert!(assets.is_empty());
    }
}
