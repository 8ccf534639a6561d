//! JW Platform v1 response types
//!
//! Every response is a JSON document with a `status` of `ok` or `error`.
//! Error documents carry a `code` such as `NotFound` or
//! `RateLimitExceeded`.

use bridge_traits::gateway::RemoteResource;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The envelope common to every response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Human readable error text
    pub fn describe(&self) -> String {
        match (&self.title, &self.message) {
            (Some(title), Some(message)) => format!("{}: {}", title, message),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => self.status.clone(),
        }
    }
}

/// `/videos/list` and `/channels/list`
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub videos: Vec<RemoteResource>,
    #[serde(default)]
    pub channels: Vec<RemoteResource>,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct KeyRef {
    pub key: String,
}

/// `/videos/create` and `/channels/create`
#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub video: Option<KeyRef>,
    #[serde(default)]
    pub channel: Option<KeyRef>,
}

impl CreateResponse {
    pub fn into_key(self) -> Option<String> {
        self.video.or(self.channel).map(|created| created.key)
    }
}

/// Upload target returned by `/videos/thumbnails/update`
#[derive(Debug, Deserialize)]
pub struct LinkRef {
    pub protocol: String,
    pub address: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UploadLinkResponse {
    pub link: LinkRef,
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailRef {
    pub status: String,
}

/// `/videos/thumbnails/show`
#[derive(Debug, Deserialize)]
pub struct ThumbnailResponse {
    pub thumbnail: ThumbnailRef,
}
