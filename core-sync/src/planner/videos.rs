//! Video planning
//!
//! Videos are matched on `sms_media_id`. Older uploads carry only
//! `sms_clip_id`; those are mapped back to their media item through the clip
//! index of the full export, whichever rendition the clip belongs to.

use super::rendition::select_renditions;
use super::{remote_identity, PlanOutcome, Planner};
use crate::diff::diff;
use crate::identity::decode;
use crate::job::{ImageCheck, ImageLoad, Job, Queue};
use crate::props::{self, image_status, kind};
use crate::resource::{download_url, expected_video, image_url};
use bridge_traits::gateway::{RemoteResource, ResourceKind};
use core_catalog::MediaItem;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

enum VideoIdentity {
    Unmanaged,
    Unknown,
    Media(i64),
}

fn classify(video: &RemoteResource, media_by_clip: &BTreeMap<i64, i64>) -> VideoIdentity {
    if let Some(media_id) = remote_identity(video, props::MEDIA_ID, kind::MEDIA) {
        return VideoIdentity::Media(media_id);
    }

    match remote_identity(video, props::CLIP_ID, kind::CLIP) {
        Some(clip_id) => media_by_clip
            .get(&clip_id)
            .map_or(VideoIdentity::Unknown, |media_id| VideoIdentity::Media(*media_id)),
        None => VideoIdentity::Unmanaged,
    }
}

impl Planner {
    /// Plan video creates and updates, plus the thumbnail jobs they imply
    #[instrument(skip_all, fields(items = items.len(), videos = remote.len()))]
    pub fn plan_videos(&self, items: &[MediaItem], remote: &[RemoteResource]) -> PlanOutcome {
        let selected = select_renditions(items);
        let media_by_clip: BTreeMap<i64, i64> = items
            .iter()
            .map(|item| (item.clip_id, item.media_id))
            .collect();

        let mut outcome = PlanOutcome::default();
        let mut associated = BTreeSet::new();
        let mut loading = BTreeSet::new();

        for video in remote {
            let media_id = match classify(video, &media_by_clip) {
                VideoIdentity::Media(media_id) => media_id,
                VideoIdentity::Unknown => {
                    outcome.stats.orphaned += 1;
                    debug!(key = %video.key, "Video names an unknown clip");
                    continue;
                }
                VideoIdentity::Unmanaged => {
                    outcome.stats.unmanaged += 1;
                    continue;
                }
            };

            let Some(item) = selected.get(&media_id).copied() else {
                outcome.stats.orphaned += 1;
                debug!(key = %video.key, media_id, "Video names an unknown media item");
                continue;
            };

            outcome.stats.matched += 1;
            associated.insert(media_id);

            let expected = expected_video(item, self.config());
            let delta = diff(&video.to_fields(), &expected);
            if delta.is_empty() {
                outcome.stats.unchanged += 1;
            } else {
                let mut update = Map::new();
                update.insert(
                    ResourceKind::Videos.key_param().to_string(),
                    Value::String(video.key.clone()),
                );
                update.extend(delta);
                outcome.jobs.push(Queue::Update, Job::Videos(update));
                outcome.stats.updated += 1;
            }

            match self.thumbnail_job(item, video) {
                Some(job @ Job::ImageCheck(_)) => {
                    outcome.jobs.push(Queue::Update, job);
                    outcome.stats.image_checks += 1;
                }
                Some(job) if loading.insert(media_id) => {
                    outcome.jobs.push(Queue::Update, job);
                    outcome.stats.image_loads += 1;
                }
                _ => {}
            }
        }

        for (media_id, item) in &selected {
            if associated.contains(media_id) {
                continue;
            }

            let mut create = expected_video(item, self.config());
            create.insert(
                "download_url".to_string(),
                Value::String(download_url(item, self.config())),
            );
            outcome.jobs.push(Queue::Create, Job::Videos(create));
            outcome.stats.created += 1;

            if let Some(load) = self.image_load(item) {
                if loading.insert(*media_id) {
                    outcome.jobs.push(Queue::Update, Job::ImageLoad(load));
                    outcome.stats.image_loads += 1;
                }
            }
        }

        info!(
            matched = outcome.stats.matched,
            unmanaged = outcome.stats.unmanaged,
            orphaned = outcome.stats.orphaned,
            unchanged = outcome.stats.unchanged,
            created = outcome.stats.created,
            updated = outcome.stats.updated,
            image_loads = outcome.stats.image_loads,
            image_checks = outcome.stats.image_checks,
            "Planned video jobs"
        );
        outcome
    }

    fn image_load(&self, item: &MediaItem) -> Option<ImageLoad> {
        if !item.has_thumbnail() {
            return None;
        }
        let image_id = item.image_id?;
        Some(ImageLoad {
            media_id: item.media_id,
            image_url: image_url(image_id, self.config()),
            image_md5: item.image_md5.clone(),
        })
    }

    /// The thumbnail job for an associated video, if any
    ///
    /// A submitted upload (`loaded`) is polled until the platform reports an
    /// outcome. Otherwise an upload is due when the stored checksum differs
    /// from the catalog's, or when it matches but no upload was ever recorded.
    fn thumbnail_job(&self, item: &MediaItem, video: &RemoteResource) -> Option<Job> {
        let load = self.image_load(item)?;

        let stored_md5 = video
            .custom_prop(props::IMAGE_MD5)
            .and_then(|field| decode(kind::IMAGE_MD5, field).ok());
        let status = video
            .custom_prop(props::IMAGE_STATUS)
            .and_then(|field| decode(kind::IMAGE_STATUS, field).ok());

        if status == Some(image_status::LOADED) {
            return Some(Job::ImageCheck(ImageCheck {
                video_key: video.key.clone(),
                media_id: item.media_id,
            }));
        }

        let md5_changed = stored_md5 != Some(load.image_md5.as_str());
        if md5_changed || status.is_none() {
            Some(Job::ImageLoad(load))
        } else {
            None
        }
    }
}
