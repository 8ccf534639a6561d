//! Rendition selection
//!
//! A logical media asset is exported once per rendition. Only one rendition
//! represents the asset remotely: the first `(format, quality)` pair of
//! [`RENDITION_PRIORITY`] that has a transcoded file.

use core_catalog::{MediaFormat, MediaItem, MediaQuality};
use std::collections::BTreeMap;
use tracing::warn;

/// Renditions from most to least preferred
pub const RENDITION_PRIORITY: [(MediaFormat, MediaQuality); 17] = [
    (MediaFormat::ArchiveH264, MediaQuality::High),
    (MediaFormat::Mpeg4, MediaQuality::High),
    (MediaFormat::Mpeg4, MediaQuality::Medium),
    (MediaFormat::Quicktime, MediaQuality::High),
    (MediaFormat::Webm, MediaQuality::High),
    (MediaFormat::Mpeg4, MediaQuality::Low),
    (MediaFormat::Flash, MediaQuality::High),
    (MediaFormat::Flash, MediaQuality::Medium),
    (MediaFormat::Flash, MediaQuality::Low),
    (MediaFormat::Aac, MediaQuality::High),
    (MediaFormat::Mp3, MediaQuality::High),
    (MediaFormat::Audio, MediaQuality::High),
    (MediaFormat::Aac, MediaQuality::Medium),
    (MediaFormat::Mp3, MediaQuality::Medium),
    (MediaFormat::Ogg, MediaQuality::High),
    (MediaFormat::Aac, MediaQuality::Low),
    (MediaFormat::Mp3, MediaQuality::Low),
];

/// Pick the preferred rendition among items sharing one `media_id`
pub fn select_rendition<'a>(renditions: &[&'a MediaItem]) -> Option<&'a MediaItem> {
    RENDITION_PRIORITY.iter().find_map(|wanted| {
        renditions
            .iter()
            .find(|item| item.rendition() == *wanted && item.has_file())
            .copied()
    })
}

/// Group `items` by `media_id` and keep the preferred rendition of each
///
/// Groups with no usable rendition are logged and dropped.
pub fn select_renditions(items: &[MediaItem]) -> BTreeMap<i64, &MediaItem> {
    let mut groups: BTreeMap<i64, Vec<&MediaItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.media_id).or_default().push(item);
    }

    let mut selected = BTreeMap::new();
    for (media_id, renditions) in groups {
        match select_rendition(&renditions) {
            Some(item) => {
                selected.insert(media_id, item);
            }
            None => {
                let clip_ids: Vec<i64> = renditions.iter().map(|item| item.clip_id).collect();
                warn!(media_id, ?clip_ids, "No usable rendition for media item");
            }
        }
    }
    selected
}
