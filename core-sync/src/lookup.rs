//! Remote lookups by legacy identity
//!
//! The platform can only search custom properties by substring, so every
//! lookup searches for the encoded id and then keeps the resources whose
//! property equals it exactly.

use crate::identity::encode;
use crate::props::{self, kind};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::gateway::{ListQuery, RemoteResource, ResourceGateway, ResourceKind};
use tracing::{debug, warn};

/// Find the resource of `resource_kind` whose `sms_<entity>_id` property is
/// exactly `<entity>:<id>:`
///
/// When several resources match, the first is returned and a warning logged.
pub async fn resource_for_entity_id(
    gateway: &dyn ResourceGateway,
    resource_kind: ResourceKind,
    entity: &str,
    id: i64,
) -> Result<Option<RemoteResource>> {
    let property = props::entity_id_property(entity);
    let value = encode(entity, id);

    let page = gateway
        .list(resource_kind, &ListQuery::custom_contains(&property, &value))
        .await?;

    let mut matching = page
        .resources
        .into_iter()
        .filter(|resource| resource.custom_prop(&property) == Some(value.as_str()));

    let first = matching.next();
    if first.is_some() && matching.next().is_some() {
        warn!(
            entity = entity,
            id = id,
            kind = %resource_kind,
            "Entity id matches at least 2 resources"
        );
    }

    debug!(entity = entity, id = id, found = first.is_some(), "Looked up entity");
    Ok(first)
}

async fn key_for(
    gateway: &dyn ResourceGateway,
    resource_kind: ResourceKind,
    entity: &str,
    id: i64,
) -> Result<String> {
    resource_for_entity_id(gateway, resource_kind, entity, id)
        .await?
        .map(|resource| resource.key)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            BridgeError::NotFound(format!(
                "no {} for {} id {}",
                resource_kind.singular(),
                entity,
                id
            ))
        })
}

/// Key of the video representing a legacy media item
pub async fn key_for_media_id(gateway: &dyn ResourceGateway, media_id: i64) -> Result<String> {
    key_for(gateway, ResourceKind::Videos, kind::MEDIA, media_id).await
}

/// Key of the video tagged with a legacy clip id
pub async fn key_for_clip_id(gateway: &dyn ResourceGateway, clip_id: i64) -> Result<String> {
    key_for(gateway, ResourceKind::Videos, kind::CLIP, clip_id).await
}

/// Key of the channel representing a legacy collection
pub async fn key_for_collection_id(
    gateway: &dyn ResourceGateway,
    collection_id: i64,
) -> Result<String> {
    key_for(gateway, ResourceKind::Channels, kind::COLLECTION, collection_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::gateway::{ResourcePage, UploadLink};
    use mockall::mock;
    use serde_json::{Map, Value};

    mock! {
        Gateway {}

        #[async_trait]
        impl ResourceGateway for Gateway {
            async fn list(&self, kind: ResourceKind, query: &ListQuery) -> Result<ResourcePage>;
            async fn create(&self, kind: ResourceKind, fields: &Map<String, Value>) -> Result<RemoteResource>;
            async fn update(
                &self,
                kind: ResourceKind,
                key: &str,
                fields: &Map<String, Value>,
            ) -> Result<RemoteResource>;
            async fn delete(&self, kind: ResourceKind, key: &str) -> Result<()>;
            async fn channel_video_keys(&self, channel_key: &str) -> Result<Vec<String>>;
            async fn insert_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;
            async fn delete_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()>;
            async fn thumbnail_upload_link(&self, video_key: &str) -> Result<UploadLink>;
            async fn upload_thumbnail(&self, link: &UploadLink, image_url: &str) -> Result<()>;
            async fn thumbnail_status(&self, video_key: &str) -> Result<String>;
        }
    }

    fn tagged(key: &str, property: &str, value: &str) -> RemoteResource {
        let mut resource = RemoteResource::new(key);
        resource.custom.insert(property.to_string(), value.to_string());
        resource
    }

    /// A gateway whose substring search returns the given resources
    fn searching(expected_kind: ResourceKind, resources: Vec<RemoteResource>) -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .withf(move |kind, query| *kind == expected_kind && query.search.is_some())
            .returning(move |_, _| {
                Ok(ResourcePage {
                    resources: resources.clone(),
                    offset: 0,
                    total: None,
                })
            });
        gateway
    }

    #[tokio::test]
    async fn test_substring_hits_are_filtered_to_exact_matches() {
        let gateway = searching(
            ResourceKind::Videos,
            vec![
                tagged("near1", "sms_media_id", "xmedia:1:"),
                tagged("near2", "sms_media_id", "media:1:x"),
                tagged("near3", "sms_media_id", "media:11:"),
                tagged("exact1", "sms_media_id", "media:1:"),
                tagged("exact2", "sms_media_id", "media:1:"),
            ],
        );

        let found = resource_for_entity_id(&gateway, ResourceKind::Videos, kind::MEDIA, 1)
            .await
            .unwrap();
        assert_eq!(found.map(|resource| resource.key), Some("exact1".to_string()));
    }

    #[tokio::test]
    async fn test_only_near_misses_is_none() {
        let gateway = searching(
            ResourceKind::Videos,
            vec![tagged("near", "sms_media_id", "media:12:")],
        );

        let found = resource_for_entity_id(&gateway, ResourceKind::Videos, kind::MEDIA, 1)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_key_for_clip_id() {
        let gateway = searching(
            ResourceKind::Videos,
            vec![
                tagged("other", "sms_clip_id", "clip:70:"),
                tagged("v7", "sms_clip_id", "clip:7:"),
            ],
        );

        assert_eq!(key_for_clip_id(&gateway, 7).await.unwrap(), "v7");
    }

    #[tokio::test]
    async fn test_key_for_collection_id() {
        let gateway = searching(
            ResourceKind::Channels,
            vec![tagged("ch3", "sms_collection_id", "collection:3:")],
        );

        assert_eq!(key_for_collection_id(&gateway, 3).await.unwrap(), "ch3");
        assert!(key_for_collection_id(&gateway, 4)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
