//! Packaging resolved files into the output archive.

use anyhow::{Context, Result};
use log::debug;

use crate::archive::ZipBuilder;
use crate::download::Downloader;
use crate::resolve::ResolvedAsset;
use crate::runlog::RunLog;

/// The finished output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedArchive {
    pub bytes: Vec<u8>,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
}

/// Downloads every asset in order and writes it into a fresh archive under
/// its filename.
///
/// The first asset claiming a filename wins; later ones are skipped without
/// being downloaded. A failed download aborts the build and nothing is
/// returned.
#[tracing::instrument(skip(assets, downloader, log))]
pub async fn build_archive<D: Downloader + ?Sized>(
    assets: &[ResolvedAsset],
    downloader: &D,
    log: &mut RunLog,
) -> Result<UpdatedArchive> {
    let mut builder = ZipBuilder::new();

    for asset in assets {
        if builder.contains(&asset.filename) {
            log.warn(format!(
                "Skipping {} for {}: file name already used",
                asset.filename, asset.mod_id
            ));
            continue;
        }

        let contents = downloader
            .fetch(&asset.url)
            .await
            .with_context(|| format!("Failed to download {}", asset.filename))?;
        debug!("Fetched {} ({} bytes)", asset.filename, contents.len());

        builder.add(&asset.filename, &contents)?;
    }

    let (bytes, entries) = builder.finish()?;
    log.info(format!("Packaged {} files", entries.len()));
    Ok(UpdatedArchive { bytes, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ZipReader;
    use crate::download::MockDownloader;
    use mockall::predicate::eq;

    fn asset(name: &str) -> ResolvedAsset {
        ResolvedAsset {
            url: format!("https://cdn/{}", name),
            filename: name.into(),
            mod_id: name.trim_end_matches(".jar").into(),
        }
    }

    #[tokio::test]
    async fn test_build_writes_every_asset() {
        let mut downloader = MockDownloader::new();
        downloader
            .expect_fetch()
            .returning(|url| Ok(format!("contents of {}", url).into_bytes()));

        let assets = [asset("sodium-1.21.jar"), asset("lithium-1.21.jar")];
        let mut log = RunLog::new();
        let archive = build_archive(&assets, &downloader, &mut log).await.unwrap();

        assert_eq!(archive.entries, vec!["sodium-1.21.jar", "lithium-1.21.jar"]);

        let mut reader = ZipReader::from_bytes(archive.bytes).unwrap();
        assert_eq!(reader.entry_names(), archive.entries);
        assert_eq!(
            reader.read_text("sodium-1.21.jar").unwrap(),
            "contents of https://cdn/sodium-1.21.jar"
        );
        assert!(log.contains("Packaged 2 files"));
    }

    #[tokio::test]
    async fn test_build_with_no_assets_is_empty_archive() {
        let downloader = MockDownloader::new();

        let mut log = RunLog::new();
        let archive = build_archive(&[], &downloader, &mut log).await.unwrap();

        assert!(archive.entries.is_empty());
        let reader = ZipReader::from_bytes(archive.bytes).unwrap();
        assert!(reader.entry_names().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_filename_is_downloaded_once() {
        let mut downloader = MockDownloader::new();
        downloader
            .expect_fetch()
            .with(eq("https://cdn/fabric-api.jar"))
            .times(1)
            .returning(|_| Ok(b"api".to_vec()));

        let assets = [asset("fabric-api.jar"), asset("fabric-api.jar")];
        let mut log = RunLog::new();
        let archive = build_archive(&assets, &downloader, &mut log).await.unwrap();

        assert_eq!(archive.entries, vec!["fabric-api.jar"]);
        assert!(log.contains("file name already used"));
    }

    #[tokio::test]
    async fn test_download_failure_aborts_build() {
        let mut downloader = MockDownloader::new();
        downloader
            .expect_fetch()
            .with(eq("https://cdn/a.jar"))
            .returning(|_| Ok(b"a".to_vec()));
        downloader
            .expect_fetch()
            .with(eq("https://cdn/b.jar"))
            .returning(|_| Err(anyhow::anyhow!("HTTP 503")));
        downloader.expect_fetch().with(eq("https://cdn/c.jar")).never();

        let assets = [asset("a.jar"), asset("b.jar"), asset("c.jar")];
        let mut log = RunLog::new();
        let err = build_archive(&assets, &downloader, &mut log)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to download b.jar"));
        assert!(!log.contains("Packaged"));
    }
}
