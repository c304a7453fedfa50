//! The end-to-end update run: validate, inspect, resolve, repack.

use anyhow::{Result, bail};
use std::fmt;

use crate::download::Downloader;
use crate::inspect::inspect;
use crate::registry::Registry;
use crate::repack::{UpdatedArchive, build_archive};
use crate::resolve::Resolver;
use crate::runlog::RunLog;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    Inspecting,
    Resolving,
    Building,
    Ready,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Validating => "validating",
            PipelineState::Inspecting => "inspecting",
            PipelineState::Resolving => "resolving",
            PipelineState::Building => "building",
            PipelineState::Ready => "ready",
            PipelineState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Runs the update stages in sequence against one registry and downloader.
///
/// Nothing survives a failed run: every call to [`Pipeline::run`] starts
/// over from the uploaded bytes.
pub struct Pipeline<'a, G: Registry + ?Sized, D: Downloader + ?Sized> {
    registry: &'a G,
    downloader: &'a D,
    history: Vec<PipelineState>,
}

impl<'a, G: Registry + ?Sized, D: Downloader + ?Sized> Pipeline<'a, G, D> {
    pub fn new(registry: &'a G, downloader: &'a D) -> Self {
        Self {
            registry,
            downloader,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineState::Idle)
    }

    /// Every state the latest run went through, starting at `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Runs all stages. The first error is recorded in `log` and returned,
    /// leaving the pipeline `Failed`. Reporting it is up to the caller.
    #[tracing::instrument(skip(self, archive, log))]
    pub async fn run(
        &mut self,
        archive: Vec<u8>,
        target_version: &str,
        log: &mut RunLog,
    ) -> Result<UpdatedArchive> {
        self.history = vec![PipelineState::Idle];

        match self.run_stages(archive, target_version, log).await {
            Ok(output) => {
                self.enter(PipelineState::Ready);
                log.info(format!(
                    "Updated archive ready with {} files",
                    output.entries.len()
                ));
                Ok(output)
            }
            Err(e) => {
                let stage = self.state();
                self.enter(PipelineState::Failed);
                log.failure(format!("Update failed while {}: {:#}", stage, e));
                Err(e)
            }
        }
    }

    async fn run_stages(
        &mut self,
        archive: Vec<u8>,
        target_version: &str,
        log: &mut RunLog,
    ) -> Result<UpdatedArchive> {
        self.enter(PipelineState::Validating);
        validate(&archive, target_version)?;

        self.enter(PipelineState::Inspecting);
        let mods = inspect(archive, log)?;

        self.enter(PipelineState::Resolving);
        let assets = Resolver::new(self.registry)
            .resolve_all(&mods, target_version, log)
            .await?;

        self.enter(PipelineState::Building);
        build_archive(&assets, self.downloader, log).await
    }

    fn enter(&mut self, state: PipelineState) {
        self.history.push(state);
    }
}

fn validate(archive: &[u8], target_version: &str) -> Result<()> {
    if archive.is_empty() {
        bail!("The uploaded archive is empty");
    }
    if target_version.trim().is_empty() {
        bail!("No game version selected");
    }
    Ok(())
}
