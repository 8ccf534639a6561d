//! Export loader
//!
//! Reads the legacy CSV exports into typed records. Every column has a fixed
//! position and a declared parser; extra trailing columns are ignored. A cell
//! that does not parse aborts the whole load, because a partially read export
//! would produce a plan that deletes or rewrites the wrong things.

use crate::error::{CatalogError, Result};
use crate::models::{CollectionItem, MediaFormat, MediaItem, MediaQuality, Visibility};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const MEDIA_COLUMNS: [&str; 31] = [
    "media_id",
    "clip_id",
    "format",
    "quality",
    "filename",
    "created_at",
    "title",
    "description",
    "collection_id",
    "instid",
    "aspect_ratio",
    "creator",
    "in_dspace",
    "publisher",
    "copyright",
    "language",
    "keywords",
    "visibility",
    "acl",
    "screencast",
    "image_id",
    "dspace_path",
    "featured",
    "branding",
    "last_updated_at",
    "updated_by",
    "downloadable",
    "withdrawn",
    "abstract",
    "priority",
    "image_md5",
];

const COLLECTION_COLUMNS: [&str; 13] = [
    "collection_id",
    "title",
    "description",
    "website_url",
    "creator",
    "instid",
    "acl",
    "media_ids",
    "image_id",
    "created_at",
    "last_updated_at",
    "updated_by",
    "image_md5",
];

/// Loader for the legacy CSV exports
///
/// ```ignore
/// use core_catalog::CatalogLoader;
///
/// let items = CatalogLoader::new().load_media_file("export.csv")?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CatalogLoader {
    skip_header: bool,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self { skip_header: true }
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the first row is a header to be skipped (default: true)
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    pub fn load_media_file(&self, path: impl AsRef<Path>) -> Result<Vec<MediaItem>> {
        self.load_media(File::open(path)?)
    }

    pub fn load_collections_file(&self, path: impl AsRef<Path>) -> Result<Vec<CollectionItem>> {
        self.load_collections(File::open(path)?)
    }

    /// Parse a media export
    pub fn load_media<R: Read>(&self, reader: R) -> Result<Vec<MediaItem>> {
        let mut csv_reader = self.reader(reader);
        let mut items = Vec::new();
        let mut renditions: HashSet<(i64, MediaFormat, MediaQuality)> = HashSet::new();

        for record in csv_reader.records() {
            let row = Row::new(record?);
            let item = parse_media_row(&row)?;

            if !renditions.insert((item.media_id, item.format, item.quality)) {
                return Err(CatalogError::DuplicateRendition {
                    row: row.number,
                    media_id: item.media_id,
                    rendition: format!("{}/{}", item.format, item.quality),
                });
            }

            items.push(item);
        }

        info!(count = items.len(), "Loaded media items from export");
        Ok(items)
    }

    /// Parse a collection export
    pub fn load_collections<R: Read>(&self, reader: R) -> Result<Vec<CollectionItem>> {
        let mut csv_reader = self.reader(reader);
        let mut items = Vec::new();

        for record in csv_reader.records() {
            let row = Row::new(record?);
            items.push(parse_collection_row(&row)?);
        }

        info!(count = items.len(), "Loaded collections from export");
        Ok(items)
    }

    fn reader<R: Read>(&self, reader: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .has_headers(self.skip_header)
            .flexible(true)
            .from_reader(reader)
    }
}

fn parse_media_row(row: &Row) -> Result<MediaItem> {
    let cell = |index: usize| row.cell(index, MEDIA_COLUMNS[index]);

    let item = MediaItem {
        media_id: cell(0)?.int()?,
        clip_id: cell(1)?.int()?,
        format: cell(2)?.parsed()?,
        quality: cell(3)?.parsed()?,
        filename: cell(4)?.string(),
        created_at: cell(5)?.timestamp()?,
        title: cell(6)?.string(),
        description: cell(7)?.string(),
        collection_id: cell(8)?.int()?,
        instid: cell(9)?.string(),
        aspect_ratio: cell(10)?.string(),
        creator: cell(11)?.string(),
        in_dspace: cell(12)?.boolean(),
        publisher: cell(13)?.string(),
        copyright: cell(14)?.string(),
        language: cell(15)?.string(),
        keywords: cell(16)?.string(),
        visibility: cell(17)?.parsed::<Visibility>()?,
        acl: cell(18)?.list(),
        screencast: cell(19)?.boolean(),
        image_id: cell(20)?.optional_int()?,
        dspace_path: cell(21)?.string(),
        featured: cell(22)?.boolean(),
        branding: cell(23)?.boolean(),
        last_updated_at: cell(24)?.optional_timestamp()?,
        updated_by: cell(25)?.string(),
        downloadable: cell(26)?.boolean(),
        withdrawn: cell(27)?.boolean(),
        abstract_text: cell(28)?.string(),
        priority: cell(29)?.optional_int()?,
        image_md5: cell(30)?.string(),
    };

    debug!(
        row = row.number,
        media_id = item.media_id,
        clip_id = item.clip_id,
        "Parsed media row"
    );
    Ok(item)
}

fn parse_collection_row(row: &Row) -> Result<CollectionItem> {
    let cell = |index: usize| row.cell(index, COLLECTION_COLUMNS[index]);

    Ok(CollectionItem {
        collection_id: cell(0)?.int()?,
        title: cell(1)?.string(),
        description: cell(2)?.string(),
        website_url: cell(3)?.string(),
        creator: cell(4)?.string(),
        instid: cell(5)?.string(),
        acl: cell(6)?.list(),
        media_ids: cell(7)?.id_set()?,
        image_id: cell(8)?.optional_int()?,
        created_at: cell(9)?.timestamp()?,
        last_updated_at: cell(10)?.optional_timestamp()?,
        updated_by: cell(11)?.string(),
        image_md5: cell(12)?.string(),
    })
}

// =============================================================================
// Cell parsers
// =============================================================================

struct Row {
    record: StringRecord,
    number: u64,
}

impl Row {
    fn new(record: StringRecord) -> Self {
        let number = record.position().map(|p| p.line()).unwrap_or_default();
        Self { record, number }
    }

    fn cell(&self, index: usize, column: &'static str) -> Result<Cell<'_>> {
        self.record
            .get(index)
            .map(|value| Cell {
                value,
                column,
                row: self.number,
            })
            .ok_or(CatalogError::MissingColumn {
                row: self.number,
                column,
            })
    }
}

struct Cell<'a> {
    value: &'a str,
    column: &'static str,
    row: u64,
}

impl Cell<'_> {
    fn invalid(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::InvalidField {
            row: self.row,
            column: self.column,
            value: self.value.to_string(),
            reason: reason.into(),
        }
    }

    fn string(&self) -> String {
        self.value.to_string()
    }

    fn int(&self) -> Result<i64> {
        self.value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| self.invalid(e.to_string()))
    }

    fn optional_int(&self) -> Result<Option<i64>> {
        if self.value.trim().is_empty() {
            Ok(None)
        } else {
            self.int().map(Some)
        }
    }

    /// Only the literal `t` is true
    fn boolean(&self) -> bool {
        self.value == "t"
    }

    fn parsed<T: FromStr<Err = String>>(&self) -> Result<T> {
        self.value.trim().parse().map_err(|e| self.invalid(e))
    }

    /// Comma split; an empty cell yields a single empty entry
    fn list(&self) -> Vec<String> {
        self.value.split(',').map(str::to_string).collect()
    }

    fn id_set(&self) -> Result<Vec<i64>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for token in self.value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let id: i64 = token
                .parse()
                .map_err(|e: std::num::ParseIntError| self.invalid(e.to_string()))?;
            if !seen.insert(id) {
                return Err(self.invalid(format!("media id {} listed twice", id)));
            }
            ids.push(id);
        }

        Ok(ids)
    }

    fn timestamp(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(self.value.trim())
            .ok_or_else(|| self.invalid("not an ISO-8601 timestamp"))
    }

    fn optional_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        if self.value.trim().is_empty() {
            Ok(None)
        } else {
            self.timestamp().map(Some)
        }
    }
}

/// Parse an ISO-8601 timestamp with either `T` or a space between date and
/// time, optional fractional seconds and optional offset. Naive values are
/// taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
