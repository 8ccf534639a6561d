//! Shared fixtures for the reconciliation integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::gateway::{
    ListQuery, RemoteResource, ResourceGateway, ResourceKind, ResourcePage, UploadLink,
};
use chrono::{TimeZone, Utc};
use core_catalog::{CollectionItem, MediaFormat, MediaItem, MediaQuality, Visibility};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

// ============================================================================
// In-memory gateway
// ============================================================================

#[derive(Default)]
struct Store {
    videos: Vec<RemoteResource>,
    channels: Vec<RemoteResource>,
    next_key: u32,
    members: BTreeMap<String, BTreeSet<String>>,
    thumbnails: BTreeMap<String, String>,
    uploads: Vec<(String, String)>,
}

impl Store {
    fn resources(&mut self, kind: ResourceKind) -> &mut Vec<RemoteResource> {
        match kind {
            ResourceKind::Videos => &mut self.videos,
            ResourceKind::Channels => &mut self.channels,
        }
    }
}

/// A resource store held in memory, behaving like the platform minus
/// throttling
#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(videos: Vec<RemoteResource>, channels: Vec<RemoteResource>) -> Self {
        let gateway = Self::new();
        {
            let mut store = gateway.store.lock().unwrap();
            store.videos = videos;
            store.channels = channels;
        }
        gateway
    }

    pub fn videos(&self) -> Vec<RemoteResource> {
        self.store.lock().unwrap().videos.clone()
    }

    pub fn channels(&self) -> Vec<RemoteResource> {
        self.store.lock().unwrap().channels.clone()
    }

    pub fn members(&self, channel_key: &str) -> BTreeSet<String> {
        self.store
            .lock()
            .unwrap()
            .members
            .get(channel_key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.store.lock().unwrap().uploads.clone()
    }

    pub fn set_thumbnail_status(&self, video_key: &str, status: &str) {
        self.store
            .lock()
            .unwrap()
            .thumbnails
            .insert(video_key.to_string(), status.to_string());
    }
}

fn not_found(kind: ResourceKind, key: &str) -> BridgeError {
    BridgeError::NotFound(format!("{} {}", kind.singular(), key))
}

#[async_trait]
impl ResourceGateway for InMemoryGateway {
    async fn list(&self, kind: ResourceKind, query: &ListQuery) -> Result<ResourcePage> {
        let mut store = self.store.lock().unwrap();
        let resources: Vec<RemoteResource> = store
            .resources(kind)
            .iter()
            .filter(|resource| match &query.search {
                Some(search) => resource
                    .custom_prop(&search.property)
                    .is_some_and(|value| value.contains(&search.value)),
                None => true,
            })
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(ResourcePage {
            resources,
            offset: query.offset,
            total: None,
        })
    }

    async fn create(&self, kind: ResourceKind, fields: &Map<String, Value>) -> Result<RemoteResource> {
        let mut store = self.store.lock().unwrap();
        store.next_key += 1;
        let key = format!("{}{}", kind.singular(), store.next_key);
        let resource = RemoteResource::from_fields(key, fields);
        store.resources(kind).push(resource.clone());
        Ok(resource)
    }

    async fn update(
        &self,
        kind: ResourceKind,
        key: &str,
        fields: &Map<String, Value>,
    ) -> Result<RemoteResource> {
        let mut store = self.store.lock().unwrap();
        let resource = store
            .resources(kind)
            .iter_mut()
            .find(|resource| resource.key == key)
            .ok_or_else(|| not_found(kind, key))?;
        resource.merge_fields(fields);
        Ok(resource.clone())
    }

    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let resources = store.resources(kind);
        let before = resources.len();
        resources.retain(|resource| resource.key != key);
        if resources.len() == before {
            return Err(not_found(kind, key));
        }
        Ok(())
    }

    async fn channel_video_keys(&self, channel_key: &str) -> Result<Vec<String>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .members
            .get(channel_key)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store
            .members
            .entry(channel_key.to_string())
            .or_default()
            .insert(video_key.to_string());
        Ok(())
    }

    async fn delete_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let removed = store
            .members
            .get_mut(channel_key)
            .is_some_and(|members| members.remove(video_key));
        if removed {
            Ok(())
        } else {
            Err(BridgeError::NotFound(format!(
                "video {} in channel {}",
                video_key, channel_key
            )))
        }
    }

    async fn thumbnail_upload_link(&self, video_key: &str) -> Result<UploadLink> {
        let store = self.store.lock().unwrap();
        if !store.videos.iter().any(|video| video.key == video_key) {
            return Err(not_found(ResourceKind::Videos, video_key));
        }
        Ok(UploadLink {
            url: format!("https://upload.example.com/{}", video_key),
            query: BTreeMap::from([("key".to_string(), video_key.to_string())]),
        })
    }

    async fn upload_thumbnail(&self, link: &UploadLink, image_url: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let video_key = link.query.get("key").cloned().unwrap_or_default();
        store.thumbnails.insert(video_key.clone(), "processing".to_string());
        store.uploads.push((video_key, image_url.to_string()));
        Ok(())
    }

    async fn thumbnail_status(&self, video_key: &str) -> Result<String> {
        self.store
            .lock()
            .unwrap()
            .thumbnails
            .get(video_key)
            .cloned()
            .ok_or_else(|| not_found(ResourceKind::Videos, video_key))
    }
}

// ============================================================================
// Catalog fixtures
// ============================================================================

pub fn media_item(media_id: i64, clip_id: i64, format: MediaFormat, quality: MediaQuality) -> MediaItem {
    MediaItem {
        media_id,
        clip_id,
        format,
        quality,
        filename: format!("/media/{}/{}.mp4", media_id, clip_id),
        created_at: Utc.with_ymd_and_hms(2015, 3, 4, 10, 0, 0).unwrap(),
        title: format!("Lecture {}", media_id),
        description: "Recorded lecture".to_string(),
        collection_id: 1,
        instid: "UIS".to_string(),
        aspect_ratio: "16:9".to_string(),
        creator: "abc12".to_string(),
        in_dspace: false,
        publisher: "University".to_string(),
        copyright: String::new(),
        language: "eng".to_string(),
        keywords: String::new(),
        visibility: Visibility::World,
        acl: vec![String::new()],
        screencast: false,
        image_id: None,
        dspace_path: String::new(),
        featured: false,
        branding: false,
        last_updated_at: None,
        updated_by: "abc12".to_string(),
        downloadable: true,
        withdrawn: false,
        abstract_text: String::new(),
        priority: None,
        image_md5: String::new(),
    }
}

pub fn video_item(media_id: i64) -> MediaItem {
    media_item(media_id, media_id * 10, MediaFormat::Mpeg4, MediaQuality::High)
}

pub fn collection(collection_id: i64, media_ids: &[i64]) -> CollectionItem {
    CollectionItem {
        collection_id,
        title: format!("Collection {}", collection_id),
        description: String::new(),
        website_url: String::new(),
        creator: "abc12".to_string(),
        instid: "UIS".to_string(),
        acl: vec![String::new()],
        media_ids: media_ids.to_vec(),
        image_id: None,
        created_at: Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap(),
        last_updated_at: None,
        updated_by: "abc12".to_string(),
        image_md5: String::new(),
    }
}

pub fn remote(key: &str, custom: &[(&str, &str)]) -> RemoteResource {
    let mut resource = RemoteResource::new(key);
    for (name, value) in custom {
        resource.custom.insert(name.to_string(), value.to_string());
    }
    resource
}
