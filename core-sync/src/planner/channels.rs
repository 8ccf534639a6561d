//! Channel planning

use super::{remote_identity, PlanOutcome, Planner};
use crate::diff::diff;
use crate::job::{Job, Queue};
use crate::props::{self, kind};
use crate::resource::expected_channel;
use bridge_traits::gateway::{RemoteResource, ResourceKind};
use core_catalog::CollectionItem;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

/// Channels created by the planner hold a hand-maintained video list
const CHANNEL_TYPE: &str = "manual";

impl Planner {
    /// Plan channel creates and updates
    #[instrument(skip_all, fields(collections = collections.len(), channels = remote.len()))]
    pub fn plan_channels(
        &self,
        collections: &[CollectionItem],
        remote: &[RemoteResource],
    ) -> PlanOutcome {
        let by_id: BTreeMap<i64, &CollectionItem> = collections
            .iter()
            .map(|collection| (collection.collection_id, collection))
            .collect();

        let mut outcome = PlanOutcome::default();
        let mut associated = BTreeSet::new();

        for channel in remote {
            let Some(collection_id) = remote_identity(channel, props::COLLECTION_ID, kind::COLLECTION)
            else {
                outcome.stats.unmanaged += 1;
                continue;
            };

            let Some(collection) = by_id.get(&collection_id) else {
                outcome.stats.orphaned += 1;
                debug!(key = %channel.key, collection_id, "Channel names an unknown collection");
                continue;
            };

            outcome.stats.matched += 1;
            associated.insert(collection_id);

            let expected = expected_channel(collection, self.config());
            let delta = diff(&channel.to_fields(), &expected);
            if delta.is_empty() {
                outcome.stats.unchanged += 1;
                continue;
            }

            let mut update = Map::new();
            update.insert(
                ResourceKind::Channels.key_param().to_string(),
                Value::String(channel.key.clone()),
            );
            update.extend(delta);
            outcome.jobs.push(Queue::Update, Job::Channels(update));
            outcome.stats.updated += 1;
        }

        for (collection_id, collection) in &by_id {
            if associated.contains(collection_id) {
                continue;
            }

            let mut create = expected_channel(collection, self.config());
            create.insert("type".to_string(), Value::String(CHANNEL_TYPE.to_string()));
            outcome.jobs.push(Queue::Create, Job::Channels(create));
            outcome.stats.created += 1;
        }

        info!(
            matched = outcome.stats.matched,
            unmanaged = outcome.stats.unmanaged,
            orphaned = outcome.stats.orphaned,
            unchanged = outcome.stats.unchanged,
            created = outcome.stats.created,
            updated = outcome.stats.updated,
            "Planned channel jobs"
        );
        outcome
    }
}
