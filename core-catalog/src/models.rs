//! Domain models for the legacy catalog export
//!
//! Records are parsed once from the export and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Enumerations
// =============================================================================

/// Encoding format of a single rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    #[serde(rename = "archive-h264")]
    ArchiveH264,
    Mpeg4,
    Flash,
    Quicktime,
    Webm,
    Ogg,
    Audio,
    Aac,
    Mp3,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 9] = [
        MediaFormat::ArchiveH264,
        MediaFormat::Mpeg4,
        MediaFormat::Flash,
        MediaFormat::Quicktime,
        MediaFormat::Webm,
        MediaFormat::Ogg,
        MediaFormat::Audio,
        MediaFormat::Aac,
        MediaFormat::Mp3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::ArchiveH264 => "archive-h264",
            MediaFormat::Mpeg4 => "mpeg4",
            MediaFormat::Flash => "flash",
            MediaFormat::Quicktime => "quicktime",
            MediaFormat::Webm => "webm",
            MediaFormat::Ogg => "ogg",
            MediaFormat::Audio => "audio",
            MediaFormat::Aac => "aac",
            MediaFormat::Mp3 => "mp3",
        }
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown media format '{}'", s))
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encoding quality of a single rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaQuality {
    High,
    Medium,
    Low,
}

impl MediaQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaQuality::High => "high",
            MediaQuality::Medium => "medium",
            MediaQuality::Low => "low",
        }
    }
}

impl FromStr for MediaQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(MediaQuality::High),
            "medium" => Ok(MediaQuality::Medium),
            "low" => Ok(MediaQuality::Low),
            other => Err(format!("unknown media quality '{}'", other)),
        }
    }
}

impl fmt::Display for MediaQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Legacy visibility setting, combined with the ACL to derive permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    World,
    WorldOverrule,
    Cam,
    CamOverrule,
    AclOverrule,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::World => "world",
            Visibility::WorldOverrule => "world-overrule",
            Visibility::Cam => "cam",
            Visibility::CamOverrule => "cam-overrule",
            Visibility::AclOverrule => "acl-overrule",
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "world" => Ok(Visibility::World),
            "world-overrule" => Ok(Visibility::WorldOverrule),
            "cam" => Ok(Visibility::Cam),
            "cam-overrule" => Ok(Visibility::CamOverrule),
            "acl-overrule" => Ok(Visibility::AclOverrule),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Media Item
// =============================================================================

/// One rendition of a legacy media asset
///
/// Several items share a `media_id`; `(media_id, format, quality)` is unique
/// within an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub media_id: i64,
    pub clip_id: i64,
    pub format: MediaFormat,
    pub quality: MediaQuality,
    /// Source path, empty if the rendition was never transcoded
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub collection_id: i64,
    pub instid: String,
    pub aspect_ratio: String,
    pub creator: String,
    pub in_dspace: bool,
    pub publisher: String,
    pub copyright: String,
    pub language: String,
    pub keywords: String,
    pub visibility: Visibility,
    pub acl: Vec<String>,
    pub screencast: bool,
    pub image_id: Option<i64>,
    pub dspace_path: String,
    pub featured: bool,
    pub branding: bool,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub updated_by: String,
    pub downloadable: bool,
    pub withdrawn: bool,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub priority: Option<i64>,
    pub image_md5: String,
}

impl MediaItem {
    /// The `(format, quality)` pair identifying this rendition
    pub fn rendition(&self) -> (MediaFormat, MediaQuality) {
        (self.format, self.quality)
    }

    /// Whether a transcoded file exists for this rendition
    pub fn has_file(&self) -> bool {
        !self.filename.trim().is_empty()
    }

    /// Whether the item references a legacy thumbnail
    pub fn has_thumbnail(&self) -> bool {
        self.image_id.is_some() && !self.image_md5.is_empty()
    }
}

// =============================================================================
// Collection Item
// =============================================================================

/// One legacy collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub collection_id: i64,
    pub title: String,
    pub description: String,
    pub website_url: String,
    pub creator: String,
    pub instid: String,
    pub acl: Vec<String>,
    /// Member media ids in export order, never duplicated
    pub media_ids: Vec<i64>,
    pub image_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub updated_by: String,
    pub image_md5: String,
}

impl CollectionItem {
    pub fn has_thumbnail(&self) -> bool {
        self.image_id.is_some() && !self.image_md5.is_empty()
    }
}
