//! # Job Executor
//!
//! Replays a job-description file against the platform.
//!
//! ## Overview
//!
//! Queues run in a fixed order (create, update, delete), one job at a time.
//! A single delay value paces the whole run:
//!
//! - after a success the delay shrinks by the decay factor (not below the
//!   minimum) and the executor sleeps before the next job
//! - after a rate-limit signal the delay grows by the growth factor (not
//!   above the maximum), the executor sleeps and retries the same job
//! - once a job has been rate limited on every allowed attempt it is recorded
//!   as `MAX_ATTEMPTS: <message>` and the run moves on
//!
//! Because the delay is shared and never reset per job, sustained throttling
//! compounds across the queue.
//!
//! Every job is safe to run twice. Creates look for an existing resource with
//! the same legacy identity and update it instead; membership jobs read the
//! channel's live membership before mutating and rewrite the membership
//! property only as their last step.
//!
//! The executor never fails as a whole: each job's result, success or
//! failure, is captured in the returned [`ExecutionLog`].

use crate::identity::{decode_id, decode_id_set, encode, encode_id_set};
use crate::job::{
    ExecutionLog, ImageCheck, ImageLoad, Job, JobFailure, JobFile, JobOutcome, MembershipChange,
    Queue,
};
use crate::lookup::{key_for_media_id, resource_for_entity_id};
use crate::props::{self, image_status, kind};
use bridge_traits::gateway::{RemoteResource, ResourceGateway, ResourceKind};
use core_runtime::config::BackoffConfig;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Fields accepted by create calls only
const CREATE_ONLY_FIELDS: [&str; 2] = ["download_url", "type"];

type JobResult = std::result::Result<JobOutcome, JobFailure>;

// ============================================================================
// Shared Delay
// ============================================================================

/// The delay shared by every job of a run
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    delay: Duration,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        let delay = config.initial_delay;
        Self { config, delay }
    }

    /// The delay to wait before the next call
    pub fn current(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Shrink the delay after a success
    pub fn on_success(&mut self) {
        self.delay = self.delay.mul_f64(self.config.decay).max(self.config.min_delay);
    }

    /// Grow the delay after a rate-limit signal
    pub fn on_rate_limit(&mut self) {
        self.delay = self.delay.mul_f64(self.config.growth).min(self.config.max_delay);
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs job files against a gateway
pub struct JobExecutor {
    gateway: Arc<dyn ResourceGateway>,
    backoff: BackoffConfig,
}

impl JobExecutor {
    pub fn new(gateway: Arc<dyn ResourceGateway>, backoff: BackoffConfig) -> Self {
        Self { gateway, backoff }
    }

    /// Execute every queue of `jobs` with a fresh shared delay
    pub async fn run(&self, jobs: &JobFile) -> ExecutionLog {
        let mut pacing = Backoff::new(self.backoff.clone());
        self.run_with(jobs, &mut pacing).await
    }

    /// Execute every queue of `jobs`, pacing with `pacing`
    #[instrument(skip_all, fields(jobs = jobs.len()))]
    pub async fn run_with(&self, jobs: &JobFile, pacing: &mut Backoff) -> ExecutionLog {
        let mut log = ExecutionLog::default();

        for queue in Queue::ORDER {
            let queue_jobs = jobs.queue(queue);
            info!(queue = %queue, count = queue_jobs.len(), "Running job queue");

            for (index, job) in queue_jobs.iter().enumerate() {
                let result = self.run_job(job, queue, pacing).await;
                match &result {
                    Ok(JobOutcome::Skipped(reason)) => {
                        info!(queue = %queue, index, job_type = job.type_name(), reason = %reason, "Job skipped");
                    }
                    Ok(_) => {
                        debug!(queue = %queue, index, job_type = job.type_name(), "Job completed");
                    }
                    Err(failure) => {
                        warn!(queue = %queue, index, job_type = job.type_name(), error = %failure, "Job failed");
                    }
                }
                log.push(queue, result.into());
            }
        }

        info!(failures = log.failures(), "Job execution finished");
        log
    }

    async fn run_job(&self, job: &Job, queue: Queue, pacing: &mut Backoff) -> JobResult {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match execute(job, queue, self.gateway.as_ref(), pacing.current()).await {
                Ok(outcome) => {
                    pacing.on_success();
                    sleep(pacing.current()).await;
                    return Ok(outcome);
                }
                Err(JobFailure::Gateway(error)) if error.is_rate_limited() => {
                    pacing.on_rate_limit();
                    warn!(
                        attempt,
                        delay_ms = pacing.current().as_millis() as u64,
                        "Rate limited, backing off"
                    );

                    if attempt >= pacing.max_attempts() {
                        return Err(JobFailure::MaxAttempts(error.to_string()));
                    }
                    sleep(pacing.current()).await;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Execute one job once
///
/// `delay` paces the remote calls inside compound jobs. Rate-limit signals
/// are returned as `JobFailure::Gateway` for the caller to retry; a missing
/// dependency yields `JobOutcome::Skipped`.
#[instrument(skip(job, gateway), fields(job_type = job.type_name()))]
pub async fn execute(
    job: &Job,
    queue: Queue,
    gateway: &dyn ResourceGateway,
    delay: Duration,
) -> JobResult {
    if !queue.accepts(job) {
        return Err(JobFailure::Invalid(format!(
            "{} job cannot run in the {} queue",
            job.type_name(),
            queue
        )));
    }

    match job {
        Job::Videos(payload) => execute_resource(ResourceKind::Videos, payload, queue, gateway, delay).await,
        Job::Channels(payload) => {
            execute_resource(ResourceKind::Channels, payload, queue, gateway, delay).await
        }
        Job::VideosInsert(change) => execute_membership(*change, true, gateway, delay).await,
        Job::VideosDelete(change) => execute_membership(*change, false, gateway, delay).await,
        Job::ImageLoad(load) => execute_image_load(load, gateway, delay).await,
        Job::ImageCheck(check) => execute_image_check(check, gateway).await,
    }
}

async fn execute_resource(
    resource_kind: ResourceKind,
    payload: &Map<String, Value>,
    queue: Queue,
    gateway: &dyn ResourceGateway,
    delay: Duration,
) -> JobResult {
    match queue {
        Queue::Create => create_or_update(resource_kind, payload, gateway, delay).await,
        Queue::Update => {
            let (key, fields) = split_key(resource_kind, payload)?;
            let resource = gateway.update(resource_kind, &key, &fields).await?;
            Ok(JobOutcome::Resource(resource))
        }
        Queue::Delete => {
            let (key, _) = split_key(resource_kind, payload)?;
            match gateway.delete(resource_kind, &key).await {
                Ok(()) => Ok(JobOutcome::Done(format!(
                    "deleted {} {}",
                    resource_kind.singular(),
                    key
                ))),
                Err(e) if e.is_not_found() => Ok(JobOutcome::Skipped(format!(
                    "{} {} already deleted",
                    resource_kind.singular(),
                    key
                ))),
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Separate the resource key parameter from the fields to send
fn split_key(
    resource_kind: ResourceKind,
    payload: &Map<String, Value>,
) -> std::result::Result<(String, Map<String, Value>), JobFailure> {
    let key_param = resource_kind.key_param();
    let key = payload
        .get(key_param)
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| JobFailure::Invalid(format!("payload has no {}", key_param)))?;

    let mut fields = payload.clone();
    fields.remove(key_param);
    Ok((key.to_string(), fields))
}

/// The legacy identity a create payload claims, if any
fn payload_identity(resource_kind: ResourceKind, payload: &Map<String, Value>) -> Option<(&'static str, i64)> {
    let entity = match resource_kind {
        ResourceKind::Videos => kind::MEDIA,
        ResourceKind::Channels => kind::COLLECTION,
    };

    payload
        .get("custom")
        .and_then(|custom| custom.get(props::entity_id_property(entity)))
        .and_then(Value::as_str)
        .and_then(|field| decode_id(entity, field).ok())
        .map(|id| (entity, id))
}

async fn create_or_update(
    resource_kind: ResourceKind,
    payload: &Map<String, Value>,
    gateway: &dyn ResourceGateway,
    delay: Duration,
) -> JobResult {
    if let Some((entity, id)) = payload_identity(resource_kind, payload) {
        let existing = resource_for_entity_id(gateway, resource_kind, entity, id).await?;
        sleep(delay).await;

        if let Some(existing) = existing {
            info!(
                kind = %resource_kind,
                key = %existing.key,
                entity,
                id,
                "Resource already exists, updating instead of creating"
            );
            let mut fields = payload.clone();
            for field in CREATE_ONLY_FIELDS {
                fields.remove(field);
            }
            let resource = gateway.update(resource_kind, &existing.key, &fields).await?;
            return Ok(JobOutcome::Resource(resource));
        }
    }

    let resource = gateway.create(resource_kind, payload).await?;
    Ok(JobOutcome::Resource(resource))
}

fn recorded_ids(channel: &RemoteResource, property: &str, encoded_kind: &str) -> BTreeSet<i64> {
    let Some(field) = channel.custom_prop(property) else {
        return BTreeSet::new();
    };

    decode_id_set(encoded_kind, field).unwrap_or_else(|e| {
        warn!(channel = %channel.key, property, error = %e, "Ignoring undecodable membership property");
        BTreeSet::new()
    })
}

async fn execute_membership(
    change: MembershipChange,
    insert: bool,
    gateway: &dyn ResourceGateway,
    delay: Duration,
) -> JobResult {
    let MembershipChange {
        collection_id,
        media_id,
    } = change;

    let Some(channel) =
        resource_for_entity_id(gateway, ResourceKind::Channels, kind::COLLECTION, collection_id)
            .await?
    else {
        return Ok(JobOutcome::Skipped(format!(
            "no channel for collection {}",
            collection_id
        )));
    };
    sleep(delay).await;

    let mut members = recorded_ids(&channel, props::MEDIA_IDS, kind::MEDIA_IDS);
    let mut failed = recorded_ids(&channel, props::FAILED_MEDIA_IDS, kind::FAILED_MEDIA_IDS);

    let video_key = match key_for_media_id(gateway, media_id).await {
        Ok(key) => Some(key),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };
    sleep(delay).await;

    // Live channel membership decides whether to mutate, not the recorded ids
    let in_channel = match &video_key {
        Some(video_key) => {
            let current = gateway.channel_video_keys(&channel.key).await?;
            sleep(delay).await;
            current.iter().any(|key| key == video_key)
        }
        None => false,
    };

    let outcome = match (insert, video_key) {
        (true, Some(video_key)) => {
            let message = if in_channel {
                format!("media {} already in collection {}", media_id, collection_id)
            } else {
                gateway.insert_channel_video(&channel.key, &video_key).await?;
                sleep(delay).await;
                format!("inserted media {} into collection {}", media_id, collection_id)
            };
            members.insert(media_id);
            failed.remove(&media_id);
            JobOutcome::Done(message)
        }
        (true, None) => {
            failed.insert(media_id);
            JobOutcome::Skipped(format!(
                "no video for media {}; recorded as failed in collection {}",
                media_id, collection_id
            ))
        }
        (false, video_key) => {
            if let (Some(video_key), true) = (video_key, in_channel) {
                match gateway.delete_channel_video(&channel.key, &video_key).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {
                        debug!(media_id, collection_id, "Video already absent from channel");
                    }
                    Err(e) => return Err(e.into()),
                }
                sleep(delay).await;
            }
            members.remove(&media_id);
            failed.remove(&media_id);
            JobOutcome::Done(format!(
                "removed media {} from collection {}",
                media_id, collection_id
            ))
        }
    };

    let fields = custom_fields([
        (props::MEDIA_IDS, encode_id_set(kind::MEDIA_IDS, &members)),
        (
            props::FAILED_MEDIA_IDS,
            encode_id_set(kind::FAILED_MEDIA_IDS, &failed),
        ),
    ]);
    gateway
        .update(ResourceKind::Channels, &channel.key, &fields)
        .await?;

    Ok(outcome)
}

/// Update fields touching only the given custom properties
fn custom_fields<const N: usize>(props: [(&str, String); N]) -> Map<String, Value> {
    let custom: Map<String, Value> = props
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::String(value)))
        .collect();

    let mut fields = Map::new();
    fields.insert("custom".to_string(), Value::Object(custom));
    fields
}

async fn execute_image_load(
    load: &ImageLoad,
    gateway: &dyn ResourceGateway,
    delay: Duration,
) -> JobResult {
    let video_key = match key_for_media_id(gateway, load.media_id).await {
        Ok(key) => key,
        Err(e) if e.is_not_found() => {
            return Ok(JobOutcome::Skipped(format!(
                "no video for media {}",
                load.media_id
            )))
        }
        Err(e) => return Err(e.into()),
    };
    sleep(delay).await;

    let link = gateway.thumbnail_upload_link(&video_key).await?;
    sleep(delay).await;

    gateway.upload_thumbnail(&link, &load.image_url).await?;
    sleep(delay).await;

    let fields = custom_fields([
        (props::IMAGE_MD5, encode(kind::IMAGE_MD5, &load.image_md5)),
        (
            props::IMAGE_STATUS,
            encode(kind::IMAGE_STATUS, image_status::LOADED),
        ),
    ]);
    let resource = gateway
        .update(ResourceKind::Videos, &video_key, &fields)
        .await?;
    Ok(JobOutcome::Resource(resource))
}

async fn execute_image_check(check: &ImageCheck, gateway: &dyn ResourceGateway) -> JobResult {
    let status = match gateway.thumbnail_status(&check.video_key).await {
        Ok(status) => status,
        Err(e) if e.is_not_found() => {
            return Ok(JobOutcome::Skipped(format!(
                "video {} (media {}) no longer exists",
                check.video_key, check.media_id
            )))
        }
        Err(e) => return Err(e.into()),
    };

    match status.as_str() {
        image_status::READY | image_status::FAILED => {
            let fields = custom_fields([(props::IMAGE_STATUS, encode(kind::IMAGE_STATUS, &status))]);
            let resource = gateway
                .update(ResourceKind::Videos, &check.video_key, &fields)
                .await?;
            Ok(JobOutcome::Resource(resource))
        }
        other => Ok(JobOutcome::Skipped(format!(
            "thumbnail for video {} is still {}",
            check.video_key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backoff_grows_and_shrinks_within_bounds() {
        let mut backoff = Backoff::new(BackoffConfig::default());
        assert_eq!(backoff.current(), Duration::from_millis(100));

        backoff.on_rate_limit();
        assert_eq!(backoff.current(), Duration::from_millis(200));

        for _ in 0..10 {
            backoff.on_rate_limit();
        }
        assert_eq!(backoff.current(), Duration::from_secs(2));

        for _ in 0..100 {
            backoff.on_success();
        }
        assert_eq!(backoff.current(), Duration::from_millis(10));
    }

    #[test]
    fn test_split_key() {
        let payload = json!({"video_key": "abc", "title": "New"});
        let (key, fields) = split_key(ResourceKind::Videos, payload.as_object().unwrap()).unwrap();
        assert_eq!(key, "abc");
        assert_eq!(fields, *json!({"title": "New"}).as_object().unwrap());

        let missing = json!({"title": "New"});
        assert!(matches!(
            split_key(ResourceKind::Channels, missing.as_object().unwrap()),
            Err(JobFailure::Invalid(_))
        ));
    }

    #[test]
    fn test_payload_identity() {
        let payload = json!({"custom": {"sms_media_id": "media:12:"}});
        assert_eq!(
            payload_identity(ResourceKind::Videos, payload.as_object().unwrap()),
            Some(("media", 12))
        );

        let channel = json!({"custom": {"sms_collection_id": "collection:3:"}});
        assert_eq!(
            payload_identity(ResourceKind::Channels, channel.as_object().unwrap()),
            Some(("collection", 3))
        );

        let bare = json!({"title": "No identity"});
        assert_eq!(payload_identity(ResourceKind::Videos, bare.as_object().unwrap()), None);
    }
}
