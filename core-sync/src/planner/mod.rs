//! # Reconciliation Planner
//!
//! Compares the legacy catalog with a snapshot of the platform and produces
//! a [`JobFile`] of creates, updates and deletes.
//!
//! ## Matching
//!
//! Every remote resource is classified by the legacy identity stored in its
//! custom properties:
//!
//! - **unmanaged**: the identity property is absent or undecodable; the
//!   resource is counted and left alone
//! - **orphaned**: the identity decodes but names no catalog record; the
//!   resource is counted and logged but never deleted here (duplicate
//!   cleanup is the job of [`crate::tidy`])
//! - **associated**: the identity names a catalog record; the expected shape
//!   is diffed against the resource and a non-empty delta becomes an update
//!
//! Catalog records with no association become creates.
//!
//! ## Determinism
//!
//! All indexes are ordered maps, so the same inputs always produce the same
//! job file in the same order.

mod channels;
mod membership;
pub mod rendition;
mod videos;

use crate::identity::decode_id;
use crate::job::JobFile;
use bridge_traits::gateway::RemoteResource;
use core_runtime::config::PlannerConfig;
use tracing::warn;

/// Tallies reported after planning so an operator can sanity-check a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Remote resources paired with a catalog record
    pub matched: usize,
    /// Remote resources without a decodable identity
    pub unmanaged: usize,
    /// Remote resources whose identity names no catalog record
    pub orphaned: usize,
    /// Associations whose remote resource already matches
    pub unchanged: usize,
    pub created: usize,
    pub updated: usize,
    pub image_loads: usize,
    pub image_checks: usize,
    /// Membership edges to add
    pub inserts: usize,
    /// Membership edges to remove
    pub deletes: usize,
    /// Collections skipped because no channel exists yet
    pub missing_channels: usize,
}

/// A planned job file with its tallies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOutcome {
    pub jobs: JobFile,
    pub stats: PlanStats,
}

/// Plans job files from catalog records and remote snapshots
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

/// Decode an identity property of a remote resource
///
/// `None` means the property is absent or undecodable. Undecodable values
/// are logged.
pub(crate) fn remote_identity(resource: &RemoteResource, property: &str, kind: &str) -> Option<i64> {
    let field = resource.custom_prop(property)?;
    match decode_id(kind, field) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(key = %resource.key, property, error = %e, "Ignoring undecodable identity");
            None
        }
    }
}
