//! Duplicate video cleanup
//!
//! Every media item should be represented by exactly one video. Tidy groups
//! videos by `sms_media_id`, keeps one per group (the first with media type
//! `video`, else the first `audio`) and plans deletes for the rest. It is the
//! only planner that deletes remote resources.

use crate::job::{Job, JobFile, Queue};
use crate::planner::remote_identity;
use crate::props::{self, kind};
use bridge_traits::gateway::{RemoteResource, ResourceKind};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Tallies reported by [`plan_tidy`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidyStats {
    /// Videos with a decodable media id
    pub grouped: usize,
    /// Distinct media ids
    pub groups: usize,
    /// Groups left alone because no video or audio resource was found
    pub undecided: usize,
    pub deletes: usize,
}

fn blessed<'a>(group: &[&'a RemoteResource]) -> Option<&'a str> {
    ["video", "audio"].into_iter().find_map(|mediatype| {
        group
            .iter()
            .find(|video| video.mediatype() == Some(mediatype))
            .map(|video| video.key.as_str())
    })
}

/// Plan deletes for every duplicate video
pub fn plan_tidy(videos: &[RemoteResource]) -> (JobFile, TidyStats) {
    let mut groups: BTreeMap<i64, Vec<&RemoteResource>> = BTreeMap::new();
    for video in videos {
        if let Some(media_id) = remote_identity(video, props::MEDIA_ID, kind::MEDIA) {
            groups.entry(media_id).or_default().push(video);
        }
    }

    let mut stats = TidyStats {
        grouped: groups.values().map(Vec::len).sum(),
        groups: groups.len(),
        ..TidyStats::default()
    };
    info!(
        grouped = stats.grouped,
        groups = stats.groups,
        ungrouped = videos.len() - stats.grouped,
        "Grouped videos by media id"
    );

    let mut jobs = JobFile::new();
    for (media_id, group) in &groups {
        let Some(keep) = blessed(group) else {
            warn!(media_id, "Could not find video or audio media for media id");
            stats.undecided += 1;
            continue;
        };

        let mut seen = BTreeSet::from([keep]);
        for video in group {
            if !seen.insert(video.key.as_str()) {
                continue;
            }
            let mut delete = Map::new();
            delete.insert(
                ResourceKind::Videos.key_param().to_string(),
                Value::String(video.key.clone()),
            );
            jobs.push(Queue::Delete, Job::Videos(delete));
            stats.deletes += 1;
        }
    }

    info!(deletes = stats.deletes, "Planned tidy jobs");
    (jobs, stats)
}
