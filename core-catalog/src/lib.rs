//! # Legacy Catalog
//!
//! Typed records for the legacy media catalog and the CSV export loader that
//! produces them.
//!
//! ## Overview
//!
//! The catalog is exported as two CSV files:
//! - a media export with one row per rendition ([`MediaItem`])
//! - a collection export with one row per collection ([`CollectionItem`])
//!
//! Both have a fixed column order. Every cell is coerced by a declared parser
//! (integer, string, enum, `t`-boolean, comma list or ISO-8601 timestamp) and a
//! malformed cell fails the whole load with a [`CatalogError`] naming the row
//! and column.
//!
//! ## Usage
//!
//! ```ignore
//! use core_catalog::CatalogLoader;
//!
//! let loader = CatalogLoader::new().skip_header(true);
//! let media = loader.load_media_file("media.csv")?;
//! let collections = loader.load_collections_file("collections.csv")?;
//! ```

pub mod error;
pub mod loader;
pub mod models;

pub use error::{CatalogError, Result};
pub use loader::{parse_timestamp, CatalogLoader};
pub use models::{CollectionItem, MediaFormat, MediaItem, MediaQuality, Visibility};
