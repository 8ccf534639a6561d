//! # Host Bridge Traits
//!
//! Contracts between the reconciliation core and the outside world.
//!
//! ## Overview
//!
//! The core never talks to the network directly. Everything it needs from the
//! outside is expressed as a trait here and implemented elsewhere:
//!
//! - [`HttpClient`](http::HttpClient) - raw HTTP transport (desktop default in
//!   `bridge-desktop`)
//! - [`ResourceGateway`](gateway::ResourceGateway) - the video platform's
//!   resource store (JW Platform implementation in `provider-jwplayer`)
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Two variants are
//! signals rather than plain failures and are matched on by the job executor:
//!
//! - `RateLimited` - back off and retry the whole job
//! - `NotFound` - a dependent lookup found nothing; skip the job
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind an `Arc` across async tasks.

pub mod error;
pub mod gateway;
pub mod http;

pub use error::BridgeError;

// Re-export commonly used types
pub use gateway::{
    CustomSearch, ListQuery, RemoteResource, ResourceGateway, ResourceKind, ResourcePage,
    UploadLink,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartFile};
