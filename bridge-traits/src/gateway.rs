//! Remote Resource Gateway
//!
//! Abstraction over the video platform's resource store. The store holds two
//! kinds of resources (videos and channels) and is reachable only through
//! list/create/update/delete operations plus channel membership and thumbnail
//! helpers. Implementations own no state between calls.
//!
//! Listing only supports substring search on custom properties, so callers
//! that need an exact match must post-filter the returned page themselves.
//!
//! Every operation may fail with [`BridgeError::RateLimited`] when the store
//! throttles the caller, and lookups of a specific resource fail with
//! [`BridgeError::NotFound`].
//!
//! [`BridgeError::RateLimited`]: crate::error::BridgeError::RateLimited
//! [`BridgeError::NotFound`]: crate::error::BridgeError::NotFound

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;

/// The two kinds of remote resource managed by the reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Videos,
    Channels,
}

impl ResourceKind {
    /// Plural name used in API paths and listing payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Videos => "videos",
            ResourceKind::Channels => "channels",
        }
    }

    /// Singular name used in create responses
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Videos => "video",
            ResourceKind::Channels => "channel",
        }
    }

    /// Name of the request parameter carrying the resource key
    pub fn key_param(&self) -> &'static str {
        match self {
            ResourceKind::Videos => "video_key",
            ResourceKind::Channels => "channel_key",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video or channel as returned by the remote store
///
/// The store treats resources as loosely typed property bags. `key` and the
/// string-valued `custom` sub-map are lifted out; everything else is kept
/// verbatim in `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResource {
    /// Remote-assigned identity
    pub key: String,

    /// Platform-defined extensible string properties
    #[serde(default, deserialize_with = "deserialize_custom")]
    pub custom: BTreeMap<String, String>,

    /// All other properties
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl RemoteResource {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            custom: BTreeMap::new(),
            properties: Map::new(),
        }
    }

    /// Build a resource from a key and a nested field map as used in job
    /// payloads. A `custom` object in `fields` becomes the custom sub-map.
    pub fn from_fields(key: impl Into<String>, fields: &Map<String, Value>) -> Self {
        let mut resource = Self::new(key);
        resource.merge_fields(fields);
        resource
    }

    /// Overlay `fields` onto this resource the way an update does
    pub fn merge_fields(&mut self, fields: &Map<String, Value>) {
        for (name, value) in fields {
            match (name.as_str(), value) {
                ("key", _) => {}
                ("custom", Value::Object(custom)) => {
                    for (prop, prop_value) in custom {
                        if let Some(text) = scalar_to_string(prop_value) {
                            self.custom.insert(prop.clone(), text);
                        }
                    }
                }
                _ => {
                    self.properties.insert(name.clone(), value.clone());
                }
            }
        }
    }

    /// Look up a custom property
    pub fn custom_prop(&self, name: &str) -> Option<&str> {
        self.custom.get(name).map(String::as_str)
    }

    /// Look up a top-level property
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// The platform media type (`video`, `audio`, ...), if reported
    pub fn mediatype(&self) -> Option<&str> {
        self.properties.get("mediatype").and_then(Value::as_str)
    }

    /// The whole resource as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_fields())
    }

    /// The whole resource as a field map, suitable for structural diffing
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut object = self.properties.clone();
        object.insert("key".to_string(), Value::String(self.key.clone()));
        object.insert(
            "custom".to_string(),
            Value::Object(
                self.custom
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        );
        object
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Custom properties are strings on the platform, but older records carry the
/// odd number or null; coerce them rather than reject the whole listing.
fn deserialize_custom<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
        .collect())
}

/// Substring search on one custom property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSearch {
    /// Custom property name, e.g. `sms_media_id`
    pub property: String,
    /// Substring to search for
    pub value: String,
}

/// Parameters for a `list` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<CustomSearch>,
    pub offset: u64,
    pub limit: u64,
}

impl ListQuery {
    /// One page of an unfiltered listing
    pub fn page(offset: u64, limit: u64) -> Self {
        Self {
            search: None,
            offset,
            limit,
        }
    }

    /// Search a custom property for a substring
    pub fn custom_contains(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            search: Some(CustomSearch {
                property: property.into(),
                value: value.into(),
            }),
            offset: 0,
            limit: 1000,
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePage {
    pub resources: Vec<RemoteResource>,
    pub offset: u64,
    pub total: Option<u64>,
}

/// Pre-signed thumbnail upload target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLink {
    /// Absolute URL to POST the image to
    pub url: String,
    /// Query parameters that must accompany the upload
    pub query: BTreeMap<String, String>,
}

/// Remote resource store contract
///
/// # Example
///
/// ```ignore
/// use bridge_traits::gateway::{ListQuery, ResourceGateway, ResourceKind};
///
/// async fn count_videos(gateway: &dyn ResourceGateway) -> Result<usize> {
///     let page = gateway.list(ResourceKind::Videos, &ListQuery::page(0, 1000)).await?;
///     Ok(page.resources.len())
/// }
/// ```
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// List one page of resources, optionally filtered by substring search
    async fn list(&self, kind: ResourceKind, query: &ListQuery) -> Result<ResourcePage>;

    /// Create a resource from a nested field map and return it with its key
    async fn create(&self, kind: ResourceKind, fields: &Map<String, Value>) -> Result<RemoteResource>;

    /// Update the named fields of an existing resource
    async fn update(
        &self,
        kind: ResourceKind,
        key: &str,
        fields: &Map<String, Value>,
    ) -> Result<RemoteResource>;

    /// Delete a resource
    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<()>;

    /// Keys of the videos currently in a channel
    async fn channel_video_keys(&self, channel_key: &str) -> Result<Vec<String>>;

    /// Add a video to a channel
    async fn insert_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;

    /// Remove a video from a channel
    async fn delete_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;

    /// Request a pre-signed upload link for a video thumbnail
    async fn thumbnail_upload_link(&self, video_key: &str) -> Result<UploadLink>;

    /// Fetch the image at `image_url` and post it to `link`
    async fn upload_thumbnail(&self, link: &UploadLink, image_url: &str) -> Result<()>;

    /// Processing status of a video's thumbnail (`ready`, `processing`, ...)
    async fn thumbnail_status(&self, video_key: &str) -> Result<String>;
}
