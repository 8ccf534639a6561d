//! Integration tests for the job executor
//!
//! These tests verify:
//! - Rate-limited jobs are retried with a shared, growing delay
//! - Exhausted retries are recorded as `MAX_ATTEMPTS` failures
//! - Misplaced jobs and missing dependencies are recorded, not raised
//! - Results are positionally parallel to the job file

mod common;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::gateway::{
    ListQuery, RemoteResource, ResourceGateway, ResourceKind, ResourcePage, UploadLink,
};
use common::{remote, InMemoryGateway};
use core_runtime::config::BackoffConfig;
use core_sync::{
    Backoff, ImageLoad, Job, JobExecutor, JobFile, JobRecord, MembershipChange, Queue,
};
use mockall::mock;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mock! {
    pub Gateway {}

    #[async_trait]
    impl ResourceGateway for Gateway {
        async fn list(&self, kind: ResourceKind, query: &ListQuery) -> Result<ResourcePage>;
        async fn create(&self, kind: ResourceKind, fields: &Map<String, Value>) -> Result<RemoteResource>;
        async fn update(
            &self,
            kind: ResourceKind,
            key: &str,
            fields: &Map<String, Value>,
        ) -> Result<RemoteResource>;
        async fn delete(&self, kind: ResourceKind, key: &str) -> Result<()>;
        async fn channel_video_keys(&self, channel_key: &str) -> Result<Vec<String>>;
        async fn insert_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;
        async fn delete_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;
        async fn thumbnail_upload_link(&self, video_key: &str) -> Result<UploadLink>;
        async fn upload_thumbnail(&self, link: &UploadLink, image_url: &str) -> Result<()>;
        async fn thumbnail_status(&self, video_key: &str) -> Result<String>;
    }
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

fn video_update(key: &str) -> Job {
    Job::Videos(payload(json!({"video_key": key, "title": "New title"})))
}

// ============================================================================
// Backoff
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limited_job_is_retried_until_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut gateway = MockGateway::new();
    gateway
        .expect_update()
        .times(3)
        .returning(move |_, key, _| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(BridgeError::RateLimited("slow down".to_string()))
            } else {
                Ok(RemoteResource::new(key))
            }
        });

    let executor = JobExecutor::new(Arc::new(gateway), BackoffConfig::default());
    let mut jobs = JobFile::new();
    jobs.push(Queue::Update, video_update("v1"));

    let mut pacing = Backoff::new(BackoffConfig::default());
    let log = executor.run_with(&jobs, &mut pacing).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(matches!(
        &log.update_responses[0],
        JobRecord::Ok { resource: Some(resource), .. } if resource["key"] == "v1"
    ));
    // 0.1s grown twice to 0.4s, then shrunk once by 0.8
    assert!((pacing.current().as_secs_f64() - 0.32).abs() < 1e-6);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_record_max_attempts() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_update()
        .times(3)
        .returning(|_, _, _| Err(BridgeError::RateLimited("slow down".to_string())));
    gateway
        .expect_delete()
        .times(1)
        .returning(|_, _| Ok(()));

    let backoff = BackoffConfig::default().with_max_attempts(3);
    let executor = JobExecutor::new(Arc::new(gateway), backoff);

    let mut jobs = JobFile::new();
    jobs.push(Queue::Update, video_update("v1"));
    jobs.push(Queue::Delete, Job::Videos(payload(json!({"video_key": "v2"}))));

    let log = executor.run(&jobs).await;

    match &log.update_responses[0] {
        JobRecord::Failed { message } => {
            assert!(message.starts_with("MAX_ATTEMPTS: "), "{}", message);
            assert!(message.contains("slow down"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(matches!(log.delete_responses[0], JobRecord::Ok { .. }));
    assert_eq!(log.failures(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_other_errors_are_not_retried() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_update()
        .times(1)
        .returning(|_, _, _| Err(BridgeError::OperationFailed("bad request".to_string())));

    let executor = JobExecutor::new(Arc::new(gateway), BackoffConfig::default());
    let mut jobs = JobFile::new();
    jobs.push(Queue::Update, video_update("v1"));

    let log = executor.run(&jobs).await;
    assert!(matches!(
        &log.update_responses[0],
        JobRecord::Failed { message } if message.starts_with("ERROR: ")
    ));
}

// ============================================================================
// Job validation and skips
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_misplaced_and_malformed_jobs_are_recorded() {
    let executor = JobExecutor::new(Arc::new(MockGateway::new()), BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(
        Queue::Delete,
        Job::VideosInsert(MembershipChange {
            collection_id: 1,
            media_id: 2,
        }),
    );
    jobs.push(Queue::Update, Job::Videos(payload(json!({"title": "no key"}))));

    let log = executor.run(&jobs).await;

    for record in [&log.update_responses[0], &log.delete_responses[0]] {
        assert!(
            matches!(record, JobRecord::Failed { message } if message.starts_with("INVALID: ")),
            "{:?}",
            record
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_deleting_missing_resource_is_skipped() {
    let gateway = Arc::new(InMemoryGateway::new());
    let executor = JobExecutor::new(gateway, BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(Queue::Delete, Job::Channels(payload(json!({"channel_key": "gone"}))));

    let log = executor.run(&jobs).await;
    assert!(matches!(log.delete_responses[0], JobRecord::Skipped { .. }));
    assert_eq!(log.failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_image_load_for_missing_video_is_skipped() {
    let gateway = Arc::new(InMemoryGateway::new());
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(
        Queue::Update,
        Job::ImageLoad(ImageLoad {
            media_id: 3,
            image_url: "https://images.example.com/3.jpg".to_string(),
            image_md5: "abc".to_string(),
        }),
    );

    let log = executor.run(&jobs).await;
    assert!(matches!(log.update_responses[0], JobRecord::Skipped { .. }));
    assert!(gateway.uploads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_membership_insert_without_channel_is_skipped() {
    let gateway = Arc::new(InMemoryGateway::with_resources(
        vec![remote("v1", &[("sms_media_id", "media:2:")])],
        vec![],
    ));
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(
        Queue::Create,
        Job::VideosInsert(MembershipChange {
            collection_id: 1,
            media_id: 2,
        }),
    );

    let log = executor.run(&jobs).await;
    assert!(matches!(
        &log.create_responses[0],
        JobRecord::Skipped { message } if message.contains("collection 1")
    ));
}

#[tokio::test(start_paused = true)]
async fn test_membership_insert_is_idempotent() {
    let gateway = Arc::new(InMemoryGateway::with_resources(
        vec![remote("v1", &[("sms_media_id", "media:2:")])],
        vec![remote(
            "ch1",
            &[
                ("sms_collection_id", "collection:1:"),
                ("sms_failed_media_ids", "failed_media_ids:2,5:"),
            ],
        )],
    ));
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(
        Queue::Create,
        Job::VideosInsert(MembershipChange {
            collection_id: 1,
            media_id: 2,
        }),
    );

    for _ in 0..2 {
        let log = executor.run(&jobs).await;
        assert!(matches!(log.create_responses[0], JobRecord::Ok { .. }));
    }

    let channel = &gateway.channels()[0];
    assert_eq!(channel.custom_prop("sms_media_ids"), Some("media_ids:2:"));
    assert_eq!(
        channel.custom_prop("sms_failed_media_ids"),
        Some("failed_media_ids:5:")
    );
    assert_eq!(gateway.members("ch1").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retried_membership_insert_does_not_insert_twice() {
    let members: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let inserts = Arc::new(AtomicUsize::new(0));
    let updates = Arc::new(AtomicUsize::new(0));

    let mut gateway = MockGateway::new();
    gateway.expect_list().returning(|kind, _| {
        let resource = match kind {
            ResourceKind::Channels => remote("ch1", &[("sms_collection_id", "collection:1:")]),
            ResourceKind::Videos => remote("v1", &[("sms_media_id", "media:2:")]),
        };
        Ok(ResourcePage {
            resources: vec![resource],
            offset: 0,
            total: Some(1),
        })
    });

    let listed = members.clone();
    gateway
        .expect_channel_video_keys()
        .returning(move |_| Ok(listed.lock().unwrap().clone()));

    let inserted = members.clone();
    let insert_calls = inserts.clone();
    gateway
        .expect_insert_channel_video()
        .returning(move |_, video_key| {
            insert_calls.fetch_add(1, Ordering::SeqCst);
            let mut members = inserted.lock().unwrap();
            if members.iter().any(|key| key == video_key) {
                return Err(BridgeError::OperationFailed(
                    "video already in channel".to_string(),
                ));
            }
            members.push(video_key.to_string());
            Ok(())
        });

    let update_calls = updates.clone();
    gateway.expect_update().returning(move |_, key, _| {
        if update_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(BridgeError::RateLimited("slow down".to_string()))
        } else {
            Ok(RemoteResource::new(key))
        }
    });

    let executor = JobExecutor::new(Arc::new(gateway), BackoffConfig::default());
    let mut jobs = JobFile::new();
    jobs.push(
        Queue::Create,
        Job::VideosInsert(MembershipChange {
            collection_id: 1,
            media_id: 2,
        }),
    );

    let log = executor.run(&jobs).await;

    assert!(
        matches!(&log.create_responses[0], JobRecord::Ok { .. }),
        "{:?}",
        log.create_responses[0]
    );
    assert_eq!(inserts.load(Ordering::SeqCst), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 2);
    assert_eq!(*members.lock().unwrap(), vec!["v1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_log_is_parallel_to_job_file() {
    let gateway = Arc::new(InMemoryGateway::with_resources(
        vec![remote("v1", &[]), remote("v2", &[])],
        vec![],
    ));
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());

    let mut jobs = JobFile::new();
    jobs.push(Queue::Update, video_update("v1"));
    jobs.push(Queue::Update, video_update("missing"));
    jobs.push(Queue::Update, video_update("v2"));

    let log = executor.run(&jobs).await;

    assert_eq!(log.update_responses.len(), 3);
    assert!(!log.update_responses[0].is_failure());
    assert!(log.update_responses[1].is_failure());
    assert!(!log.update_responses[2].is_failure());
    assert!(log.create_responses.is_empty());
    assert_eq!(
        gateway.videos()[1].property("title"),
        Some(&json!("New title"))
    );
}
