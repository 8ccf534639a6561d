//! Integration tests for planning and applying reconciliation jobs
//!
//! These tests verify:
//! - Membership diffing between legacy collections and channel properties
//! - Rendition selection
//! - Orphaned and unmanaged resources are left alone
//! - Planning is deterministic
//! - Applying a plan converges: re-planning afterwards yields no changes
//! - Re-applying creates does not duplicate resources

mod common;

use common::{collection, media_item, remote, video_item, InMemoryGateway};
use core_catalog::{MediaFormat, MediaQuality};
use core_runtime::config::{BackoffConfig, PlannerConfig};
use core_sync::{Job, JobExecutor, JobFile, MembershipChange, Planner};
use std::sync::Arc;

fn planner() -> Planner {
    Planner::new(
        PlannerConfig::new("https://downloads.example.com")
            .with_image_base_url("https://images.example.com"),
    )
}

fn update_payloads(jobs: &JobFile) -> Vec<serde_json::Map<String, serde_json::Value>> {
    jobs.update
        .iter()
        .filter_map(|job| match job {
            Job::Videos(payload) | Job::Channels(payload) => Some(payload.clone()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_membership_diff_inserts_and_deletes() {
    let collections = vec![collection(7, &[2, 3, 4])];
    let channels = vec![remote(
        "ch1",
        &[
            ("sms_collection_id", "collection:7:"),
            ("sms_media_ids", "media_ids:1,2,3:"),
        ],
    )];

    let outcome = planner().plan_memberships(&collections, &channels);

    assert_eq!(
        outcome.jobs.create,
        vec![Job::VideosInsert(MembershipChange {
            collection_id: 7,
            media_id: 4
        })]
    );
    assert_eq!(
        outcome.jobs.delete,
        vec![Job::VideosDelete(MembershipChange {
            collection_id: 7,
            media_id: 1
        })]
    );
    assert!(outcome.jobs.update.is_empty());
}

#[test]
fn test_failed_members_count_as_present() {
    let collections = vec![collection(7, &[2, 3])];
    let channels = vec![remote(
        "ch1",
        &[
            ("sms_collection_id", "collection:7:"),
            ("sms_media_ids", "media_ids:2:"),
            ("sms_failed_media_ids", "failed_media_ids:3:"),
        ],
    )];

    let outcome = planner().plan_memberships(&collections, &channels);
    assert!(outcome.jobs.is_empty());
}

#[test]
fn test_collections_without_channel_are_skipped() {
    let collections = vec![collection(7, &[1]), collection(8, &[2])];
    let channels = vec![remote("ch1", &[("sms_collection_id", "collection:7:")])];

    let outcome = planner().plan_memberships(&collections, &channels);
    assert_eq!(outcome.stats.missing_channels, 1);
    assert_eq!(outcome.jobs.create.len(), 1);
}

// ============================================================================
// Videos
// ============================================================================

#[test]
fn test_rendition_selection_prefers_priority_order() {
    let mut archive = media_item(1, 10, MediaFormat::ArchiveH264, MediaQuality::High);
    archive.filename.clear();
    let items = vec![
        media_item(1, 11, MediaFormat::Flash, MediaQuality::High),
        archive,
        media_item(1, 12, MediaFormat::Mpeg4, MediaQuality::High),
        media_item(1, 13, MediaFormat::Mp3, MediaQuality::High),
    ];

    let outcome = planner().plan_videos(&items, &[]);

    assert_eq!(outcome.jobs.create.len(), 1);
    let Job::Videos(create) = &outcome.jobs.create[0] else {
        panic!("expected a video create");
    };
    assert_eq!(create["custom"]["sms_clip_id"], "clip:12:");
    assert_eq!(create["download_url"], "https://downloads.example.com/media/1/12.mp4");
}

#[test]
fn test_group_without_usable_rendition_is_dropped() {
    let mut item = video_item(1);
    item.filename.clear();

    let outcome = planner().plan_videos(&[item], &[]);
    assert!(outcome.jobs.is_empty());
}

#[test]
fn test_orphaned_and_unmanaged_videos_are_left_alone() {
    let items = vec![video_item(1)];
    let videos = vec![
        remote("orphan", &[("sms_media_id", "media:99:")]),
        remote("garbled", &[("sms_media_id", "clip:1:")]),
        remote("foreign", &[]),
    ];

    let outcome = planner().plan_videos(&items, &videos);

    assert_eq!(outcome.stats.orphaned, 1);
    assert_eq!(outcome.stats.unmanaged, 2);
    assert_eq!(outcome.stats.matched, 0);
    assert!(outcome.jobs.delete.is_empty());
    assert_eq!(outcome.jobs.create.len(), 1);
}

#[test]
fn test_video_update_carries_key_and_delta_only() {
    let items = vec![video_item(1)];
    let mut video = remote("v1", &[("sms_media_id", "media:1:")]);
    video
        .properties
        .insert("title".to_string(), "Old title".into());
    video
        .properties
        .insert("duration".to_string(), 12.5.into());

    let outcome = planner().plan_videos(&items, &[video]);
    let updates = update_payloads(&outcome.jobs);

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["video_key"], "v1");
    assert_eq!(updates[0]["title"], "Lecture 1");
    assert!(!updates[0].contains_key("duration"));
    assert!(!updates[0].contains_key("download_url"));
    assert!(!updates[0]["custom"]
        .as_object()
        .unwrap()
        .contains_key("sms_media_id"));
    assert!(!updates[0]["custom"]
        .as_object()
        .unwrap()
        .contains_key("sms_image_md5"));
    assert!(outcome.jobs.create.is_empty());
}

#[test]
fn test_clip_id_fallback_matches_media_item() {
    let items = vec![
        media_item(1, 10, MediaFormat::Mpeg4, MediaQuality::High),
        media_item(1, 11, MediaFormat::Mp3, MediaQuality::High),
    ];
    let videos = vec![remote("v1", &[("sms_clip_id", "clip:11:")])];

    let outcome = planner().plan_videos(&items, &videos);

    assert_eq!(outcome.stats.matched, 1);
    assert!(outcome.jobs.create.is_empty());
    let updates = update_payloads(&outcome.jobs);
    assert_eq!(updates[0]["custom"]["sms_media_id"], "media:1:");
    assert_eq!(updates[0]["custom"]["sms_clip_id"], "clip:10:");
}

#[test]
fn test_thumbnail_jobs_follow_stored_status() {
    let mut item = video_item(1);
    item.image_id = Some(55);
    item.image_md5 = "abc".to_string();

    let cases = [
        (vec![], Some("image_load")),
        (vec![("sms_image_md5", "image_md5:old:")], Some("image_load")),
        (
            vec![
                ("sms_image_md5", "image_md5:old:"),
                ("sms_image_status", "image_status:loaded:"),
            ],
            Some("image_check"),
        ),
        (
            vec![
                ("sms_image_md5", "image_md5:abc:"),
                ("sms_image_status", "image_status:ready:"),
            ],
            None,
        ),
        (vec![("sms_image_md5", "image_md5:abc:")], Some("image_load")),
    ];

    for (custom, expected) in cases {
        let mut props = vec![("sms_media_id", "media:1:")];
        props.extend(custom.iter().copied());
        let video = remote("v1", &props);

        let outcome = planner().plan_videos(std::slice::from_ref(&item), &[video]);
        let image_jobs: Vec<&str> = outcome
            .jobs
            .update
            .iter()
            .map(Job::type_name)
            .filter(|name| name.starts_with("image_"))
            .collect();
        assert_eq!(image_jobs, expected.into_iter().collect::<Vec<_>>(), "{:?}", custom);
    }
}

#[test]
fn test_planning_is_deterministic() {
    let items: Vec<_> = (1..=20).rev().map(video_item).collect();
    let videos = vec![
        remote("v3", &[("sms_media_id", "media:3:")]),
        remote("v5", &[("sms_media_id", "media:5:")]),
    ];
    let collections = vec![collection(2, &[5, 1]), collection(1, &[3])];

    let planner = planner();
    assert_eq!(planner.plan_videos(&items, &videos), planner.plan_videos(&items, &videos));
    assert_eq!(
        planner.plan_channels(&collections, &[]),
        planner.plan_channels(&collections, &[])
    );
}

// ============================================================================
// Channels
// ============================================================================

#[test]
fn test_channel_create_and_update() {
    let collections = vec![collection(1, &[]), collection(2, &[])];
    let channels = vec![remote(
        "ch2",
        &[("sms_collection_id", "collection:2:"), ("sms_acl", "acl:CAM:")],
    )];

    let outcome = planner().plan_channels(&collections, &channels);

    let Job::Channels(create) = &outcome.jobs.create[0] else {
        panic!("expected a channel create");
    };
    assert_eq!(create["type"], "manual");
    assert_eq!(create["custom"]["sms_collection_id"], "collection:1:");

    let updates = update_payloads(&outcome.jobs);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["channel_key"], "ch2");
    assert_eq!(updates[0]["custom"]["sms_acl"], "acl:WORLD:");
}

// ============================================================================
// Plan, apply, re-plan
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_apply_then_replan_converges() {
    let mut with_thumbnail = video_item(2);
    with_thumbnail.image_id = Some(77);
    with_thumbnail.image_md5 = "feed".to_string();
    let items = vec![video_item(1), with_thumbnail, video_item(3)];

    let mut stale = remote("existing", &[("sms_media_id", "media:1:")]);
    stale.properties.insert("title".to_string(), "Stale".into());
    let gateway = Arc::new(InMemoryGateway::with_resources(vec![stale], vec![]));
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());
    let planner = planner();

    let first = planner.plan_videos(&items, &gateway.videos());
    assert_eq!(first.stats.created, 2);
    assert_eq!(first.stats.updated, 1);
    assert_eq!(first.stats.image_loads, 1);

    let log = executor.run(&first.jobs).await;
    assert_eq!(log.failures(), 0);
    assert_eq!(
        gateway.uploads(),
        vec![(
            gateway.videos()[1].key.clone(),
            "https://images.example.com/77.jpg".to_string()
        )]
    );

    // The upload is in flight: only a status poll remains.
    let second = planner.plan_videos(&items, &gateway.videos());
    assert!(second.jobs.create.is_empty());
    assert_eq!(second.stats.unchanged, 3);
    assert_eq!(
        second.jobs.update.iter().map(Job::type_name).collect::<Vec<_>>(),
        vec!["image_check"]
    );

    let video_key = gateway.videos()[1].key.clone();
    gateway.set_thumbnail_status(&video_key, "ready");
    let log = executor.run(&second.jobs).await;
    assert_eq!(log.failures(), 0);

    let third = planner.plan_videos(&items, &gateway.videos());
    assert!(third.jobs.is_empty());
    assert_eq!(
        gateway.videos()[1].custom_prop("sms_image_status"),
        Some("image_status:ready:")
    );
}

#[tokio::test(start_paused = true)]
async fn test_reapplying_creates_does_not_duplicate() {
    let items = vec![video_item(1)];
    let collections = vec![collection(4, &[1])];
    let gateway = Arc::new(InMemoryGateway::new());
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());

    let videos = planner().plan_videos(&items, &[]);
    let channels = planner().plan_channels(&collections, &[]);
    for _ in 0..2 {
        executor.run(&videos.jobs).await;
        executor.run(&channels.jobs).await;
    }

    assert_eq!(gateway.videos().len(), 1);
    assert_eq!(gateway.channels().len(), 1);
    assert!(planner().plan_channels(&collections, &gateway.channels()).jobs.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_membership_apply_converges() {
    let items = vec![video_item(1), video_item(2)];
    let collections = vec![collection(4, &[1, 2, 3])];
    let gateway = Arc::new(InMemoryGateway::new());
    let executor = JobExecutor::new(gateway.clone(), BackoffConfig::default());
    let planner = planner();

    executor.run(&planner.plan_videos(&items, &[]).jobs).await;
    executor.run(&planner.plan_channels(&collections, &[]).jobs).await;

    let plan = planner.plan_memberships(&collections, &gateway.channels());
    assert_eq!(plan.stats.inserts, 3);
    let log = executor.run(&plan.jobs).await;
    assert_eq!(log.failures(), 0);

    let channel = &gateway.channels()[0];
    assert_eq!(channel.custom_prop("sms_media_ids"), Some("media_ids:1,2:"));
    assert_eq!(
        channel.custom_prop("sms_failed_media_ids"),
        Some("failed_media_ids:3:")
    );
    assert_eq!(gateway.members(&channel.key).len(), 2);

    assert!(planner
        .plan_memberships(&collections, &gateway.channels())
        .jobs
        .is_empty());

    // Dropping media 1 from the collection removes it from the channel.
    let shrunk = vec![collection(4, &[2, 3])];
    let plan = planner.plan_memberships(&shrunk, &gateway.channels());
    assert_eq!(plan.stats.deletes, 1);
    executor.run(&plan.jobs).await;

    let channel = &gateway.channels()[0];
    assert_eq!(channel.custom_prop("sms_media_ids"), Some("media_ids:2:"));
    assert_eq!(gateway.members(&channel.key).len(), 1);
}
