//! # Job Model
//!
//! Jobs are plain data: a `{type, resource}` record produced by a planner,
//! written to a job-description file for review, and replayed later by the
//! executor. Nothing here talks to the platform.
//!
//! ## Job-description file
//!
//! ```text
//! {
//!   "create": [ {"type": "videos", "resource": {...}}, ... ],
//!   "update": [ {"type": "image_load", "resource": {...}}, ... ],
//!   "delete": [ {"type": "videos", "resource": {"video_key": "..."}}, ... ]
//! }
//! ```
//!
//! Missing queues read as empty. An unknown `type` fails deserialization of
//! the whole file.
//!
//! ## Execution log
//!
//! The executor answers with one [`JobRecord`] per job, positionally parallel
//! to the input queues.

use crate::error::Result;
use bridge_traits::error::BridgeError;
use bridge_traits::gateway::RemoteResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Jobs
// ============================================================================

/// Membership edge between a collection and one of its media items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipChange {
    pub collection_id: i64,
    pub media_id: i64,
}

/// Thumbnail upload for the video representing `media_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLoad {
    pub media_id: i64,
    pub image_url: String,
    pub image_md5: String,
}

/// Poll of a submitted thumbnail's processing status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCheck {
    pub video_key: String,
    pub media_id: i64,
}

/// A planned operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "resource", rename_all = "snake_case")]
pub enum Job {
    /// Create, update or delete a video; the payload shape depends on the queue
    Videos(Map<String, Value>),
    /// Create, update or delete a channel; the payload shape depends on the queue
    Channels(Map<String, Value>),
    VideosInsert(MembershipChange),
    VideosDelete(MembershipChange),
    ImageLoad(ImageLoad),
    ImageCheck(ImageCheck),
}

impl Job {
    /// The `type` tag as written in job files
    pub fn type_name(&self) -> &'static str {
        match self {
            Job::Videos(_) => "videos",
            Job::Channels(_) => "channels",
            Job::VideosInsert(_) => "videos_insert",
            Job::VideosDelete(_) => "videos_delete",
            Job::ImageLoad(_) => "image_load",
            Job::ImageCheck(_) => "image_check",
        }
    }
}

/// The three job queues, executed in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    Create,
    Update,
    Delete,
}

impl Queue {
    pub const ORDER: [Queue; 3] = [Queue::Create, Queue::Update, Queue::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::Create => "create",
            Queue::Update => "update",
            Queue::Delete => "delete",
        }
    }

    /// Whether a job of this variant may appear in this queue
    pub fn accepts(&self, job: &Job) -> bool {
        matches!(
            (self, job),
            (_, Job::Videos(_))
                | (_, Job::Channels(_))
                | (Queue::Create, Job::VideosInsert(_))
                | (Queue::Update, Job::ImageLoad(_))
                | (Queue::Update, Job::ImageCheck(_))
                | (Queue::Delete, Job::VideosDelete(_))
        )
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The hand-off between planning and execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub create: Vec<Job>,
    #[serde(default)]
    pub update: Vec<Job>,
    #[serde(default)]
    pub delete: Vec<Job>,
}

impl JobFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, queue: Queue) -> &[Job] {
        match queue {
            Queue::Create => &self.create,
            Queue::Update => &self.update,
            Queue::Delete => &self.delete,
        }
    }

    pub fn push(&mut self, queue: Queue, job: Job) {
        match queue {
            Queue::Create => self.create.push(job),
            Queue::Update => self.update.push(job),
            Queue::Delete => self.delete.push(job),
        }
    }

    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// What a successful job produced
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The platform returned the created or updated resource
    Resource(RemoteResource),
    /// Completed without a resource to report
    Done(String),
    /// Nothing to do, or a dependency was missing; the reason is kept
    Skipped(String),
}

/// Why a job did not complete
#[derive(Error, Debug)]
pub enum JobFailure {
    /// Every attempt was rate limited
    #[error("MAX_ATTEMPTS: {0}")]
    MaxAttempts(String),
    /// The platform rejected the operation
    #[error("ERROR: {0}")]
    Gateway(#[from] BridgeError),
    /// The job itself is malformed or in the wrong queue
    #[error("INVALID: {0}")]
    Invalid(String),
}

impl JobFailure {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, JobFailure::Gateway(e) if e.is_rate_limited())
    }
}


// ============================================================================
// Execution Log
// ============================================================================

/// Serialized result of one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobRecord {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Skipped {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl JobRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self, JobRecord::Failed { .. })
    }
}

impl From<std::result::Result<JobOutcome, JobFailure>> for JobRecord {
    fn from(result: std::result::Result<JobOutcome, JobFailure>) -> Self {
        match result {
            Ok(JobOutcome::Resource(resource)) => JobRecord::Ok {
                resource: Some(resource.to_value()),
                message: None,
            },
            Ok(JobOutcome::Done(message)) => JobRecord::Ok {
                resource: None,
                message: Some(message),
            },
            Ok(JobOutcome::Skipped(message)) => JobRecord::Skipped { message },
            Err(failure) => JobRecord::Failed {
                message: failure.to_string(),
            },
        }
    }
}

/// Results of an executor run, positionally parallel to the job file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub create_responses: Vec<JobRecord>,
    pub update_responses: Vec<JobRecord>,
    pub delete_responses: Vec<JobRecord>,
}

impl ExecutionLog {
    pub fn responses(&self, queue: Queue) -> &[JobRecord] {
        match queue {
            Queue::Create => &self.create_responses,
            Queue::Update => &self.update_responses,
            Queue::Delete => &self.delete_responses,
        }
    }

    pub(crate) fn push(&mut self, queue: Queue, record: JobRecord) {
        match queue {
            Queue::Create => self.create_responses.push(record),
            Queue::Update => self.update_responses.push(record),
            Queue::Delete => self.delete_responses.push(record),
        }
    }

    /// Number of jobs that failed
    pub fn failures(&self) -> usize {
        Queue::ORDER
            .iter()
            .flat_map(|queue| self.responses(*queue))
            .filter(|record| record.is_failure())
            .count()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
