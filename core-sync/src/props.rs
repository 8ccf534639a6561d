//! Custom property names
//!
//! Every migrated legacy field lives under `custom.sms_<field>`. Identity
//! properties double as search keys for remote lookups.

pub const MEDIA_ID: &str = "sms_media_id";
pub const CLIP_ID: &str = "sms_clip_id";
pub const COLLECTION_ID: &str = "sms_collection_id";
pub const CREATED_AT: &str = "sms_created_at";
pub const INSTID: &str = "sms_instid";
pub const ASPECT_RATIO: &str = "sms_aspect_ratio";
pub const CREATED_BY: &str = "sms_created_by";
pub const PUBLISHER: &str = "sms_publisher";
pub const COPYRIGHT: &str = "sms_copyright";
pub const LANGUAGE: &str = "sms_language";
pub const KEYWORDS: &str = "sms_keywords";
pub const ACL: &str = "sms_acl";
pub const SCREENCAST: &str = "sms_screencast";
pub const IMAGE_ID: &str = "sms_image_id";
pub const FEATURED: &str = "sms_featured";
pub const BRANDING: &str = "sms_branding";
pub const LAST_UPDATED_AT: &str = "sms_last_updated_at";
pub const UPDATED_BY: &str = "sms_updated_by";
pub const DOWNLOADABLE: &str = "sms_downloadable";
pub const WITHDRAWN: &str = "sms_withdrawn";
pub const WEBSITE_URL: &str = "sms_website_url";
pub const IMAGE_MD5: &str = "sms_image_md5";

/// Channel membership as last written by the executor
pub const MEDIA_IDS: &str = "sms_media_ids";
/// Members whose insert found no video
pub const FAILED_MEDIA_IDS: &str = "sms_failed_media_ids";
/// Thumbnail lifecycle: `loaded`, `ready` or `failed`
pub const IMAGE_STATUS: &str = "sms_image_status";

/// Encoded type names paired with the properties above
pub mod kind {
    pub const MEDIA: &str = "media";
    pub const CLIP: &str = "clip";
    pub const COLLECTION: &str = "collection";
    pub const MEDIA_IDS: &str = "media_ids";
    pub const FAILED_MEDIA_IDS: &str = "failed_media_ids";
    pub const IMAGE_MD5: &str = "image_md5";
    pub const IMAGE_STATUS: &str = "image_status";
}

/// Thumbnail lifecycle values stored under [`IMAGE_STATUS`]
pub mod image_status {
    pub const LOADED: &str = "loaded";
    pub const READY: &str = "ready";
    pub const FAILED: &str = "failed";
}

/// The identity property searched for an entity type (`media` → `sms_media_id`)
pub fn entity_id_property(entity: &str) -> String {
    format!("sms_{}_id", entity)
}
