//! # JW Platform Provider
//!
//! Implements `ResourceGateway` for the JW Platform v1 management API.
//!
//! ## Overview
//!
//! This module provides:
//! - Signed requests (SHA-1 over sorted parameters plus the API secret)
//! - Paged video and channel listing with custom property search
//! - Create, update and delete for videos and channels
//! - Channel membership changes
//! - Thumbnail upload from a legacy image URL and status polling
//!
//! Throttling and missing resources are reported as
//! `BridgeError::RateLimited` and `BridgeError::NotFound` so the job executor
//! can back off or skip.

mod connector;
pub mod error;
mod types;

pub use connector::{flatten_fields, signature, JwPlatformConnector};
pub use error::{JwPlatformError, Result};
