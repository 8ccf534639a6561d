//! Fetching and caching remote listings
//!
//! Planners work from a snapshot of the platform written to disk by `fetch`:
//! one JSON file per page, named `<base-name><offset:06>.json` and holding
//! `{"videos": [...]}` or `{"channels": [...]}`. Any number of such files can
//! be read back and concatenated.

use crate::error::{Result, SyncError};
use crate::executor::Backoff;
use bridge_traits::gateway::{ListQuery, RemoteResource, ResourceGateway, ResourceKind};
use core_runtime::config::BackoffConfig;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::time::sleep;
use tracing::{info, warn};

/// Page size requested from the platform
pub const PAGE_SIZE: u64 = 1000;

/// File name for the page starting at `offset`
pub fn page_file_name(base_name: &str, offset: u64) -> String {
    format!("{}{:06}.json", base_name, offset)
}

/// Serialize one page in the listing format the planners read back
pub fn page_document(kind: ResourceKind, resources: &[RemoteResource]) -> Value {
    let mut document = Map::new();
    document.insert(
        kind.as_str().to_string(),
        Value::Array(resources.iter().map(RemoteResource::to_value).collect()),
    );
    Value::Object(document)
}

/// Page through every resource of `kind`, writing each page next to
/// `base_name` until the platform returns an empty page
///
/// Pages are paced and rate-limited pages retried with the executor's
/// backoff.
pub async fn fetch_all(
    gateway: &dyn ResourceGateway,
    kind: ResourceKind,
    base_name: &str,
    backoff: &BackoffConfig,
) -> Result<Vec<PathBuf>> {
    let mut pacing = Backoff::new(backoff.clone());
    let mut written = Vec::new();
    let mut offset = 0;

    loop {
        info!(kind = %kind, offset = offset, "Fetching resources");
        let page = fetch_page(gateway, kind, offset, &mut pacing).await?;
        info!(count = page.len(), "Got resources");

        if page.is_empty() {
            info!("Stopping");
            break;
        }

        let path = PathBuf::from(page_file_name(base_name, offset));
        info!(path = %path.display(), "Saving page");
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, &page_document(kind, &page))?;
        writer.flush()?;
        written.push(path);

        offset += page.len() as u64;
    }

    Ok(written)
}

async fn fetch_page(
    gateway: &dyn ResourceGateway,
    kind: ResourceKind,
    offset: u64,
    pacing: &mut Backoff,
) -> Result<Vec<RemoteResource>> {
    let query = ListQuery::page(offset, PAGE_SIZE);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match gateway.list(kind, &query).await {
            Ok(page) => {
                pacing.on_success();
                sleep(pacing.current()).await;
                return Ok(page.resources);
            }
            Err(e) if e.is_rate_limited() && attempt < pacing.max_attempts() => {
                pacing.on_rate_limit();
                warn!(
                    attempt = attempt,
                    delay_ms = pacing.current().as_millis() as u64,
                    "Rate limited while listing, backing off"
                );
                sleep(pacing.current()).await;
            }
            Err(e) => return Err(SyncError::Bridge(e)),
        }
    }
}

/// Read resources of `kind` from any number of listing files
pub fn read_resources<P: AsRef<Path>>(kind: ResourceKind, paths: &[P]) -> Result<Vec<RemoteResource>> {
    let mut resources = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let document: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;

        let Some(entries) = document.get(kind.as_str()) else {
            warn!(path = %path.display(), kind = %kind, "Listing file has no entries");
            continue;
        };

        let page: Vec<RemoteResource> =
            serde_json::from_value(entries.clone()).map_err(|e| SyncError::InvalidMetadata {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        resources.extend(page);
    }

    info!(count = resources.len(), kind = %kind, "Loaded remote metadata");
    Ok(resources)
}
