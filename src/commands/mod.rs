use anyhow::{Context, Result, anyhow, bail};
use log::info;
use std::path::PathBuf;

use crate::{
    download::Downloader,
    pipeline::Pipeline,
    registry::Registry,
    runlog::RunLog,
    runtime::Runtime,
    versions::{VersionSelector, VersionSource},
};

pub mod config;

use config::Config;

/// File name used when no `--output` is given.
pub const DEFAULT_OUTPUT: &str = "updated_mods.zip";

/// Options of the `update` command.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub archive: PathBuf,
    pub game_version: Option<String>,
    pub include_snapshots: bool,
    pub output: PathBuf,
}

/// Print the selectable game versions.
#[tracing::instrument(skip(runtime, api_url, manifest_url))]
pub async fn versions<R: Runtime + 'static>(
    runtime: R,
    include_snapshots: bool,
    limit: usize,
    api_url: Option<String>,
    manifest_url: Option<String>,
) -> Result<()> {
    let config = Config::new(runtime, api_url, manifest_url)?;
    for line in list_versions(&config.versions, include_snapshots, limit).await {
        println!("{}", line);
    }
    Ok(())
}

/// Labels of the selectable versions, or the unavailable placeholder.
pub async fn list_versions<V: VersionSource + ?Sized>(
    source: &V,
    include_snapshots: bool,
    limit: usize,
) -> Vec<String> {
    let mut log = RunLog::new();
    let mut selector = VersionSelector::with_limit(limit);
    selector.refresh(source, include_snapshots, &mut log).await;
    selector.options().iter().map(|o| o.label.clone()).collect()
}

/// Update every mod in an archive and write the new archive.
#[tracing::instrument(skip(runtime, options, api_url, manifest_url))]
pub async fn update<R: Runtime + 'static>(
    runtime: R,
    options: UpdateOptions,
    api_url: Option<String>,
    manifest_url: Option<String>,
) -> Result<()> {
    let config = Config::new(runtime, api_url, manifest_url)?;
    let written = run_update(&config, &options).await?;

    if written.is_empty() {
        println!(
            "No mods could be updated; wrote an empty archive to {}",
            options.output.display()
        );
    } else {
        println!(
            "Wrote {} updated mods to {}:",
            written.len(),
            options.output.display()
        );
        for name in &written {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Runs the pipeline for `options` and writes the output archive.
/// Returns the names of the files written into it.
pub async fn run_update<R: Runtime, G: Registry, D: Downloader, V: VersionSource>(
    config: &Config<R, G, D, V>,
    options: &UpdateOptions,
) -> Result<Vec<String>> {
    let mut log = RunLog::new();

    if !config.runtime.exists(&options.archive) {
        bail!("Archive not found: {}", options.archive.display());
    }
    let archive = config
        .runtime
        .read(&options.archive)
        .with_context(|| format!("Failed to read archive {}", options.archive.display()))?;

    let target_version = match &options.game_version {
        Some(version) => version.clone(),
        None => {
            let mut selector = VersionSelector::new();
            selector
                .refresh(&config.versions, options.include_snapshots, &mut log)
                .await;
            selector.selected().map(str::to_string).ok_or_else(|| {
                anyhow!("No game version available; pass one with --game-version")
            })?
        }
    };
    info!("Updating mods for game version {}", target_version);

    let mut pipeline = Pipeline::new(&config.registry, &config.downloader);
    let output = pipeline.run(archive, &target_version, &mut log).await?;

    config
        .runtime
        .write(&options.output, &output.bytes)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    Ok(output.entries)
}
