//! Videos-in-channels planning
//!
//! A channel records its members in `sms_media_ids`, and the members whose
//! insert found no video in `sms_failed_media_ids`. Both count as present:
//! a failed insert is not retried until the collection changes.

use super::{remote_identity, PlanOutcome, Planner};
use crate::identity::decode_id_set;
use crate::job::{Job, MembershipChange, Queue};
use crate::props::{self, kind};
use bridge_traits::gateway::RemoteResource;
use core_catalog::CollectionItem;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

fn recorded_members(channel: &RemoteResource) -> BTreeSet<i64> {
    let mut members = BTreeSet::new();

    for (property, encoded_kind) in [
        (props::MEDIA_IDS, kind::MEDIA_IDS),
        (props::FAILED_MEDIA_IDS, kind::FAILED_MEDIA_IDS),
    ] {
        let Some(field) = channel.custom_prop(property) else {
            continue;
        };
        match decode_id_set(encoded_kind, field) {
            Ok(ids) => members.extend(ids),
            Err(e) => {
                warn!(key = %channel.key, property, error = %e, "Ignoring undecodable membership");
            }
        }
    }

    members
}

impl Planner {
    /// Plan membership inserts and deletes for every collection with a channel
    #[instrument(skip_all, fields(collections = collections.len(), channels = remote.len()))]
    pub fn plan_memberships(
        &self,
        collections: &[CollectionItem],
        remote: &[RemoteResource],
    ) -> PlanOutcome {
        let mut outcome = PlanOutcome::default();
        let mut channels: BTreeMap<i64, &RemoteResource> = BTreeMap::new();

        for channel in remote {
            match remote_identity(channel, props::COLLECTION_ID, kind::COLLECTION) {
                Some(collection_id) if channels.contains_key(&collection_id) => {
                    warn!(collection_id, key = %channel.key, "Collection has several channels");
                }
                Some(collection_id) => {
                    channels.insert(collection_id, channel);
                }
                None => outcome.stats.unmanaged += 1,
            }
        }

        let by_id: BTreeMap<i64, &CollectionItem> = collections
            .iter()
            .map(|collection| (collection.collection_id, collection))
            .collect();

        for (collection_id, collection) in &by_id {
            let Some(channel) = channels.get(collection_id) else {
                outcome.stats.missing_channels += 1;
                debug!(collection_id, "No channel for collection yet");
                continue;
            };
            outcome.stats.matched += 1;

            let legacy: BTreeSet<i64> = collection.media_ids.iter().copied().collect();
            let recorded = recorded_members(channel);

            for media_id in legacy.difference(&recorded) {
                outcome.jobs.push(
                    Queue::Create,
                    Job::VideosInsert(MembershipChange {
                        collection_id: *collection_id,
                        media_id: *media_id,
                    }),
                );
                outcome.stats.inserts += 1;
            }

            for media_id in recorded.difference(&legacy) {
                outcome.jobs.push(
                    Queue::Delete,
                    Job::VideosDelete(MembershipChange {
                        collection_id: *collection_id,
                        media_id: *media_id,
                    }),
                );
                outcome.stats.deletes += 1;
            }
        }

        outcome.stats.orphaned = channels
            .keys()
            .filter(|collection_id| !by_id.contains_key(collection_id))
            .count();

        info!(
            matched = outcome.stats.matched,
            missing_channels = outcome.stats.missing_channels,
            orphaned = outcome.stats.orphaned,
            inserts = outcome.stats.inserts,
            deletes = outcome.stats.deletes,
            "Planned membership jobs"
        );
        outcome
    }
}
