//! Expected-resource builder
//!
//! Pure functions turning a catalog record into the shape its remote
//! resource should have. The planner diffs this shape against what the
//! platform reports; the executor sends it verbatim on create.
//!
//! Only an allowlist of fields is migrated. Raw filenames, DSpace paths,
//! abstracts, priorities and the format/quality pair stay behind.

use crate::acl::convert_acl;
use crate::identity::{encode, encode_optional, encode_timestamp};
use crate::props::{self, kind};
use chrono::{DateTime, Utc};
use core_catalog::{CollectionItem, MediaItem, Visibility};
use core_runtime::config::PlannerConfig;
use serde_json::{Map, Value};

/// Strip C0 control characters (keeping newlines) and truncate to
/// `max_length` characters. The platform rejects both overlong text and
/// control characters.
pub fn sanitise(text: &str, max_length: usize) -> String {
    text.chars()
        .filter(|c| *c == '\n' || (*c as u32) >= 0x20)
        .take(max_length)
        .collect()
}

fn insert_prop(custom: &mut Map<String, Value>, name: &str, value: String) {
    custom.insert(name.to_string(), Value::String(value));
}

fn optional_timestamp(kind: &str, value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(at) => encode_timestamp(kind, at),
        None => encode(kind, ""),
    }
}

/// Custom properties for a media item, including `sms_image_md5`
pub fn video_custom_props(item: &MediaItem) -> Map<String, Value> {
    let mut custom = Map::new();
    insert_prop(&mut custom, props::MEDIA_ID, encode(kind::MEDIA, item.media_id));
    insert_prop(&mut custom, props::CLIP_ID, encode(kind::CLIP, item.clip_id));
    insert_prop(
        &mut custom,
        props::CREATED_AT,
        encode_timestamp("created_at", &item.created_at),
    );
    insert_prop(
        &mut custom,
        props::COLLECTION_ID,
        encode(kind::COLLECTION, item.collection_id),
    );
    insert_prop(&mut custom, props::INSTID, encode("instid", &item.instid));
    insert_prop(
        &mut custom,
        props::ASPECT_RATIO,
        encode("aspect_ratio", &item.aspect_ratio),
    );
    insert_prop(&mut custom, props::CREATED_BY, encode("created_by", &item.creator));
    insert_prop(&mut custom, props::PUBLISHER, encode("publisher", &item.publisher));
    insert_prop(&mut custom, props::COPYRIGHT, encode("copyright", &item.copyright));
    insert_prop(&mut custom, props::LANGUAGE, encode("language", &item.language));
    insert_prop(&mut custom, props::KEYWORDS, encode("keywords", &item.keywords));
    insert_prop(
        &mut custom,
        props::ACL,
        encode("acl", convert_acl(item.visibility, &item.acl)),
    );
    insert_prop(&mut custom, props::SCREENCAST, encode("screencast", item.screencast));
    insert_prop(&mut custom, props::IMAGE_ID, encode_optional("image_id", item.image_id));
    insert_prop(&mut custom, props::FEATURED, encode("featured", item.featured));
    insert_prop(&mut custom, props::BRANDING, encode("branding", item.branding));
    insert_prop(
        &mut custom,
        props::LAST_UPDATED_AT,
        optional_timestamp("last_updated_at", &item.last_updated_at),
    );
    insert_prop(&mut custom, props::UPDATED_BY, encode("updated_by", &item.updated_by));
    insert_prop(
        &mut custom,
        props::DOWNLOADABLE,
        encode("downloadable", item.downloadable),
    );
    insert_prop(&mut custom, props::WITHDRAWN, encode("withdrawn", item.withdrawn));
    insert_prop(&mut custom, props::IMAGE_MD5, encode(kind::IMAGE_MD5, &item.image_md5));
    custom
}

/// Custom properties for a collection
///
/// Membership properties are owned by the executor and never appear here.
pub fn channel_custom_props(collection: &CollectionItem) -> Map<String, Value> {
    let mut custom = Map::new();
    insert_prop(
        &mut custom,
        props::COLLECTION_ID,
        encode(kind::COLLECTION, collection.collection_id),
    );
    insert_prop(
        &mut custom,
        props::CREATED_AT,
        encode_timestamp("created_at", &collection.created_at),
    );
    insert_prop(
        &mut custom,
        props::WEBSITE_URL,
        encode("website_url", &collection.website_url),
    );
    insert_prop(
        &mut custom,
        props::CREATED_BY,
        encode("created_by", &collection.creator),
    );
    insert_prop(&mut custom, props::INSTID, encode("instid", &collection.instid));
    // Collections carry no visibility; an empty ACL means public.
    insert_prop(
        &mut custom,
        props::ACL,
        encode("acl", convert_acl(Visibility::World, &collection.acl)),
    );
    insert_prop(
        &mut custom,
        props::IMAGE_ID,
        encode_optional("image_id", collection.image_id),
    );
    insert_prop(
        &mut custom,
        props::LAST_UPDATED_AT,
        optional_timestamp("last_updated_at", &collection.last_updated_at),
    );
    insert_prop(
        &mut custom,
        props::UPDATED_BY,
        encode("updated_by", &collection.updated_by),
    );
    insert_prop(
        &mut custom,
        props::IMAGE_MD5,
        encode(kind::IMAGE_MD5, &collection.image_md5),
    );
    custom
}

fn insert_text(resource: &mut Map<String, Value>, config: &PlannerConfig, name: &str, text: &str) {
    let value = sanitise(text, config.max_text_length);
    if !value.trim().is_empty() {
        resource.insert(name.to_string(), Value::String(value));
    }
}

/// The expected video resource for a media item
///
/// `sms_image_md5` is left out: it is written only once a thumbnail upload
/// has been submitted, so a failed upload is retried on the next pass.
pub fn expected_video(item: &MediaItem, config: &PlannerConfig) -> Map<String, Value> {
    let mut custom = video_custom_props(item);
    custom.remove(props::IMAGE_MD5);

    let mut resource = Map::new();
    resource.insert("custom".to_string(), Value::Object(custom));
    insert_text(&mut resource, config, "title", &item.title);
    insert_text(&mut resource, config, "description", &item.description);
    resource.insert("date".to_string(), Value::from(item.created_at.timestamp()));
    resource
}

/// The expected channel resource for a collection
pub fn expected_channel(collection: &CollectionItem, config: &PlannerConfig) -> Map<String, Value> {
    let mut resource = Map::new();
    resource.insert(
        "custom".to_string(),
        Value::Object(channel_custom_props(collection)),
    );
    insert_text(&mut resource, config, "title", &collection.title);
    insert_text(&mut resource, config, "description", &collection.description);
    resource
}

/// Download URL for a rendition: the filename with `strip_leading` path
/// components removed, joined onto the configured base URL
pub fn download_url(item: &MediaItem, config: &PlannerConfig) -> String {
    let path = item
        .filename
        .trim_matches('/')
        .split('/')
        .skip(config.strip_leading)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", config.base_url.trim_end_matches('/'), path)
}

/// URL of a legacy thumbnail image
pub fn image_url(image_id: i64, config: &PlannerConfig) -> String {
    format!("{}/{}.jpg", config.image_base_url.trim_end_matches('/'), image_id)
}
