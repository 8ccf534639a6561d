//! Subcommand implementations
//!
//! Planning commands are pure file-to-file transformations. `fetch` and
//! `applyupdatejob` need a gateway, which `main` builds from credentials.

use anyhow::{Context, Result};
use bridge_traits::gateway::{RemoteResource, ResourceGateway, ResourceKind};
use core_catalog::CatalogLoader;
use core_runtime::config::{BackoffConfig, PlannerConfig};
use core_sync::{plan_tidy, read_resources, ExecutionLog, JobExecutor, JobFile, PlanOutcome, Planner};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::PlanTarget;

/// Fetch every resource of `kind` into `<base_name><offset>.json` files
pub async fn fetch(
    gateway: &dyn ResourceGateway,
    kind: ResourceKind,
    base_name: &str,
    backoff: &BackoffConfig,
) -> Result<Vec<PathBuf>> {
    core_sync::fetch_all(gateway, kind, base_name, backoff)
        .await
        .with_context(|| format!("Failed to fetch {}", kind))
}

/// Plan a job file for `target` from a catalog export and listing files
pub fn plan(
    target: PlanTarget,
    csv: &Path,
    metadata: &[PathBuf],
    config: PlannerConfig,
) -> Result<PlanOutcome> {
    let planner = Planner::new(config);
    let loader = CatalogLoader::new();

    let outcome = match target {
        PlanTarget::Videos => {
            let items = loader
                .load_media_file(csv)
                .with_context(|| format!("Failed to load media export {}", csv.display()))?;
            let videos = read_listing(ResourceKind::Videos, metadata)?;
            planner.plan_videos(&items, &videos)
        }
        PlanTarget::Channels => {
            let collections = loader
                .load_collections_file(csv)
                .with_context(|| format!("Failed to load collection export {}", csv.display()))?;
            let channels = read_listing(ResourceKind::Channels, metadata)?;
            planner.plan_channels(&collections, &channels)
        }
        PlanTarget::VideosInChannels => {
            let collections = loader
                .load_collections_file(csv)
                .with_context(|| format!("Failed to load collection export {}", csv.display()))?;
            let channels = read_listing(ResourceKind::Channels, metadata)?;
            planner.plan_memberships(&collections, &channels)
        }
    };

    info!(jobs = outcome.jobs.len(), stats = ?outcome.stats, "Planned job file");
    Ok(outcome)
}

/// Plan deletes for duplicate videos
pub fn tidy(metadata: &[PathBuf]) -> Result<JobFile> {
    let videos = read_listing(ResourceKind::Videos, metadata)?;
    let (jobs, stats) = plan_tidy(&videos);
    info!(jobs = jobs.len(), stats = ?stats, "Planned tidy job file");
    Ok(jobs)
}

/// Run a job file and optionally persist the execution log
pub async fn apply(
    gateway: Arc<dyn ResourceGateway>,
    backoff: BackoffConfig,
    jobs: &JobFile,
    log_file: Option<&Path>,
) -> Result<ExecutionLog> {
    let executor = JobExecutor::new(gateway, backoff);
    let log = executor.run(jobs).await;

    let failures = log.failures();
    if failures > 0 {
        warn!(failures, total = jobs.len(), "Some jobs failed");
    }

    if let Some(path) = log_file {
        log.write_to(path)
            .with_context(|| format!("Failed to write execution log {}", path.display()))?;
    }

    Ok(log)
}

/// Read a job file, from stdin when no path is given
pub fn read_jobs(path: Option<&Path>) -> Result<JobFile> {
    match path {
        Some(path) => {
            JobFile::read_from(path).with_context(|| format!("Failed to read job file {}", path.display()))
        }
        None => JobFile::from_reader(BufReader::new(io::stdin().lock()))
            .context("Failed to read job file from stdin"),
    }
}

/// Write a job file, to stdout when no path is given
pub fn write_jobs(jobs: &JobFile, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            jobs.write_to(path).with_context(|| format!("Failed to write job file {}", path.display()))
        }
        None => {
            let mut stdout = BufWriter::new(io::stdout().lock());
            jobs.to_writer(&mut stdout).context("Failed to write job file")?;
            writeln!(stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn read_listing(kind: ResourceKind, metadata: &[PathBuf]) -> Result<Vec<RemoteResource>> {
    read_resources(kind, metadata).with_context(|| format!("Failed to read {} listing files", kind))
}
