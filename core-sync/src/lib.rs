//! # Catalog Reconciliation
//!
//! Reconciles the legacy media catalog with the video platform.
//!
//! ## Overview
//!
//! Reconciliation runs in two phases joined by a human-readable job file:
//! - Planning compares catalog records with a fetched snapshot of the
//!   platform and writes create/update/delete jobs
//! - Execution replays a job file against the platform, pacing itself to
//!   stay under the platform's rate limit and logging every result
//!
//! ## Components
//!
//! - **Identity Codec** (`identity`): `"<type>:<value>:"` encoding of legacy ids in custom properties
//! - **ACL Conversion** (`acl`, `institutions`): legacy visibility and ACL to permission entries
//! - **Expected Resources** (`resource`): the remote shape of a catalog record
//! - **Delta** (`diff`): one-directional structural diff
//! - **Planner** (`planner`): videos, channels and videos-in-channels
//! - **Tidy** (`tidy`): duplicate video cleanup
//! - **Jobs** (`job`): job model, job file and execution log
//! - **Executor** (`executor`): rate-limited, retrying job replay
//! - **Fetch** (`fetch`, `lookup`): paged listing snapshots and identity lookups

pub mod acl;
pub mod diff;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod identity;
pub mod institutions;
pub mod job;
pub mod lookup;
pub mod planner;
pub mod props;
pub mod resource;
pub mod tidy;

pub use error::{Result, SyncError};
pub use executor::{execute, Backoff, JobExecutor};
pub use fetch::{fetch_all, read_resources};
pub use job::{
    ExecutionLog, ImageCheck, ImageLoad, Job, JobFailure, JobFile, JobOutcome, JobRecord,
    MembershipChange, Queue,
};
pub use planner::{PlanOutcome, PlanStats, Planner};
pub use tidy::{plan_tidy, TidyStats};
