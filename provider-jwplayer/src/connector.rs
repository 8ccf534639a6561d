//! JW Platform API connector implementation
//!
//! Implements the `ResourceGateway` trait for the JW Platform v1 management
//! API.
//!
//! ## Request signing
//!
//! Every call carries `api_key`, `api_nonce` (8 random digits),
//! `api_timestamp` and `api_format=json`. The parameters are sorted,
//! percent-encoded, joined as a query string, suffixed with the API secret
//! and hashed with SHA-1; the hex digest is sent as `api_signature`.
//!
//! ## Parameters
//!
//! Nested field maps are flattened with dots, so `{"custom": {"sms_acl": ..}}`
//! is sent as `custom.sms_acl`.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::gateway::{
    ListQuery, RemoteResource, ResourceGateway, ResourceKind, ResourcePage, UploadLink,
};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::Utc;
use core_runtime::config::Credentials;
use core_runtime::logging::redact_if_sensitive;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::JwPlatformError;
use crate::types::{
    ApiStatus, CreateResponse, ListResponse, ThumbnailResponse, UploadLinkResponse,
};

/// Timeout for API calls
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for channel membership listings
const CHANNEL_PAGE_SIZE: usize = 1000;

/// Timeout for image transfers
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Flatten a nested field map into dotted request parameters
pub fn flatten_fields(fields: &Map<String, Value>) -> BTreeMap<String, String> {
    fn visit(prefix: &str, fields: &Map<String, Value>, params: &mut BTreeMap<String, String>) {
        for (name, value) in fields {
            let key = format!("{}{}", prefix, name);
            match value {
                Value::Object(nested) => visit(&format!("{}.", key), nested, params),
                Value::Null => {}
                Value::String(text) => {
                    params.insert(key, text.clone());
                }
                other => {
                    params.insert(key, other.to_string());
                }
            }
        }
    }

    let mut params = BTreeMap::new();
    visit("", fields, &mut params);
    params
}

/// Percent-encode sorted parameters as a query string
fn encode_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-1 signature of the sorted, encoded parameters followed by the secret
pub fn signature(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(encode_params(params).as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn nonce() -> String {
    format!("{:08}", uuid::Uuid::new_v4().as_u128() % 100_000_000)
}

/// JW Platform API connector
///
/// # Example
///
/// ```ignore
/// use provider_jwplayer::JwPlatformConnector;
/// use bridge_traits::gateway::{ListQuery, ResourceGateway, ResourceKind};
///
/// let connector = JwPlatformConnector::new(http_client, credentials, "https://api.jwplatform.com/v1");
/// let page = connector.list(ResourceKind::Videos, &ListQuery::page(0, 1000)).await?;
/// ```
pub struct JwPlatformConnector {
    http_client: Arc<dyn HttpClient>,
    credentials: Credentials,
    base_url: String,
}

impl JwPlatformConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Add the authentication parameters and signature
    fn sign(&self, mut params: BTreeMap<String, String>) -> BTreeMap<String, String> {
        params.insert("api_format".to_string(), "json".to_string());
        params.insert("api_key".to_string(), self.credentials.api_key.clone());
        params.insert("api_nonce".to_string(), nonce());
        params.insert("api_timestamp".to_string(), Utc::now().timestamp().to_string());

        let signature = signature(&params, &self.credentials.api_secret);
        debug!(
            api_key = %redact_if_sensitive("api_key", &self.credentials.api_key),
            "Signed request"
        );
        params.insert("api_signature".to_string(), signature);
        params
    }

    /// Call an API path and decode the `ok` response
    ///
    /// Reads go out as GET with a query string, mutations as a form POST.
    #[instrument(skip(self, params))]
    async fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: BTreeMap<String, String>,
    ) -> std::result::Result<T, JwPlatformError> {
        let params = self.sign(params);
        let url = format!("{}{}", self.base_url, path);

        let request = match method {
            HttpMethod::Get => params.into_iter().fold(
                HttpRequest::new(HttpMethod::Get, url),
                |request, (key, value)| request.query_param(key, value),
            ),
            HttpMethod::Post => HttpRequest::new(HttpMethod::Post, url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(encode_params(&params).into()),
        }
        .timeout(API_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "API call returned");
        decode_response(path, &response)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: BTreeMap<String, String>,
    ) -> std::result::Result<T, JwPlatformError> {
        self.call(HttpMethod::Get, path, params).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: BTreeMap<String, String>,
    ) -> std::result::Result<T, JwPlatformError> {
        self.call(HttpMethod::Post, path, params).await
    }

    async fn fetch_image(&self, image_url: &str) -> std::result::Result<bytes::Bytes, JwPlatformError> {
        let request = HttpRequest::new(HttpMethod::Get, image_url).timeout(UPLOAD_TIMEOUT);
        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(JwPlatformError::ImageDownload {
                status_code: response.status,
                url: image_url.to_string(),
            });
        }
        Ok(response.body)
    }
}

fn key_params(name: &str, key: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(name.to_string(), key.to_string())])
}

/// Map an API response to its payload or a typed error
fn decode_response<T: DeserializeOwned>(
    path: &str,
    response: &HttpResponse,
) -> std::result::Result<T, JwPlatformError> {
    let status: Option<ApiStatus> = serde_json::from_slice(&response.body).ok();

    let error_code = status
        .as_ref()
        .filter(|status| !status.is_ok())
        .and_then(|status| status.code.clone());
    let describe = || {
        status
            .as_ref()
            .map(ApiStatus::describe)
            .unwrap_or_else(|| String::from_utf8_lossy(&response.body).to_string())
    };

    if response.status == 429 || error_code.as_deref() == Some("RateLimitExceeded") {
        warn!(path, "JW Platform rate limit exceeded");
        return Err(JwPlatformError::RateLimitExceeded(describe()));
    }

    if response.status == 404 || error_code.as_deref() == Some("NotFound") {
        return Err(JwPlatformError::NotFound(format!("{}: {}", path, describe())));
    }

    if !response.is_success() || status.as_ref().is_some_and(|status| !status.is_ok()) {
        return Err(JwPlatformError::ApiError {
            status_code: response.status,
            code: error_code.unwrap_or_else(|| "Unknown".to_string()),
            message: describe(),
        });
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| JwPlatformError::ParseError(format!("{}: {}", path, e)))
}

#[async_trait]
impl ResourceGateway for JwPlatformConnector {
    #[instrument(skip(self, query), fields(offset = query.offset))]
    async fn list(&self, kind: ResourceKind, query: &ListQuery) -> Result<ResourcePage> {
        let mut params = BTreeMap::from([
            ("result_limit".to_string(), query.limit.to_string()),
            ("result_offset".to_string(), query.offset.to_string()),
        ]);
        if let Some(search) = &query.search {
            params.insert(format!("search:custom.{}", search.property), search.value.clone());
        }

        let response: ListResponse = self.get(&format!("/{}/list", kind), params).await?;
        let resources = match kind {
            ResourceKind::Videos => response.videos,
            ResourceKind::Channels => response.channels,
        };

        debug!(count = resources.len(), total = ?response.total, "Listed resources");
        Ok(ResourcePage {
            resources,
            offset: response.offset,
            total: response.total,
        })
    }

    #[instrument(skip(self, payload))]
    async fn create(&self, kind: ResourceKind, payload: &Map<String, Value>) -> Result<RemoteResource> {
        let response: CreateResponse = self
            .post(&format!("/{}/create", kind), flatten_fields(payload))
            .await?;

        let key = response.into_key().ok_or_else(|| {
            JwPlatformError::ParseError(format!("create response has no {} key", kind.singular()))
        })?;
        debug!(key = %key, "Created resource");
        Ok(RemoteResource::from_fields(key, payload))
    }

    /// The API does not echo the resource back, so the returned resource
    /// holds only the submitted fields
    #[instrument(skip(self, payload))]
    async fn update(
        &self,
        kind: ResourceKind,
        key: &str,
        payload: &Map<String, Value>,
    ) -> Result<RemoteResource> {
        let mut params = flatten_fields(payload);
        params.insert(kind.key_param().to_string(), key.to_string());

        let _: ApiStatus = self.post(&format!("/{}/update", kind), params).await?;
        Ok(RemoteResource::from_fields(key, payload))
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<()> {
        let _: ApiStatus = self
            .post(&format!("/{}/delete", kind), key_params(kind.key_param(), key))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn channel_video_keys(&self, channel_key: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        loop {
            let mut params = key_params("channel_key", channel_key);
            params.insert("result_limit".to_string(), CHANNEL_PAGE_SIZE.to_string());
            params.insert("result_offset".to_string(), keys.len().to_string());

            let response: ListResponse = self.get("/channels/videos/list", params).await?;
            let count = response.videos.len();
            keys.extend(response.videos.into_iter().map(|video| video.key));

            if count < CHANNEL_PAGE_SIZE {
                break;
            }
        }

        debug!(count = keys.len(), "Listed channel videos");
        Ok(keys)
    }

    #[instrument(skip(self))]
    async fn insert_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()> {
        let mut params = key_params("channel_key", channel_key);
        params.insert("video_key".to_string(), video_key.to_string());
        let _: ApiStatus = self.post("/channels/videos/create", params).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_channel_video(&self, channel_key: &str, video_key: &str) -> Result<()> {
        let mut params = key_params("channel_key", channel_key);
        params.insert("video_key".to_string(), video_key.to_string());
        let _: ApiStatus = self.post("/channels/videos/delete", params).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn thumbnail_upload_link(&self, video_key: &str) -> Result<UploadLink> {
        let response: UploadLinkResponse = self
            .post("/videos/thumbnails/update", key_params("video_key", video_key))
            .await?;

        let link = response.link;
        let query = link
            .query
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(text) => (name, text),
                other => (name, other.to_string()),
            })
            .collect();

        Ok(UploadLink {
            url: format!("{}://{}{}", link.protocol, link.address, link.path),
            query,
        })
    }

    #[instrument(skip(self, link), fields(url = %link.url))]
    async fn upload_thumbnail(&self, link: &UploadLink, image_url: &str) -> Result<()> {
        let image = self.fetch_image(image_url).await?;
        debug!(bytes = image.len(), "Fetched thumbnail source");

        let mut query = link.query.clone();
        query.insert("api_format".to_string(), "json".to_string());

        let request = query
            .into_iter()
            .fold(HttpRequest::new(HttpMethod::Post, &link.url), |request, (key, value)| {
                request.query_param(key, value)
            })
            .multipart_file("file", "thumbnail.jpg", image)
            .timeout(UPLOAD_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        let _: ApiStatus = decode_response("thumbnail upload", &response)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn thumbnail_status(&self, video_key: &str) -> Result<String> {
        let response: ThumbnailResponse = self
            .get("/videos/thumbnails/show", key_params("video_key", video_key))
            .await?;
        Ok(response.thumbnail.status)
    }
}
