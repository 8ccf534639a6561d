//! # Identity Codec
//!
//! Typed values are stored in the platform's string-only custom properties as
//! `"<type>:<value>:"`. The type prefix and trailing colon let a substring
//! search for `media:1:` be post-filtered to an exact match, so it never
//! picks up `media:21:` or `media:1045:`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_sync::identity::{decode, decode_id, encode};
//!
//! let field = encode("media", 42);
//! assert_eq!(field, "media:42:");
//! assert_eq!(decode("media", &field)?, "42");
//! assert_eq!(decode_id("media", &field)?, 42);
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::LazyLock;
use thiserror::Error;

static CUSTOM_PROP_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z][a-z0-9_]*):(.*):$").expect("custom property pattern is valid")
});

/// Reasons an encoded field could not be decoded
///
/// Callers treat every variant as "no match": the resource is skipped with a
/// warning, never a fatal error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Field has invalid format: {field}")]
    Format { field: String },

    #[error("Field has unexpected type \"{found}\". Expected \"{expected}\".")]
    TypeMismatch { expected: String, found: String },

    #[error("Field value \"{value}\" is not a valid {expected} id")]
    InvalidId { expected: String, value: String },
}

/// Encode `value` as `"<kind>:<value>:"`
pub fn encode(kind: &str, value: impl Display) -> String {
    format!("{}:{}:", kind, value)
}

/// Encode an optional value; absent values encode as the empty string
pub fn encode_optional<T: Display>(kind: &str, value: Option<T>) -> String {
    match value {
        Some(value) => encode(kind, value),
        None => encode(kind, ""),
    }
}

/// Encode a timestamp in RFC 3339 form
pub fn encode_timestamp(kind: &str, value: &DateTime<Utc>) -> String {
    encode(kind, value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Encode a set of ids as a comma-joined list in ascending order
pub fn encode_id_set(kind: &str, ids: &BTreeSet<i64>) -> String {
    let joined = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    encode(kind, joined)
}

/// Decode a field of the form `"<kind>:<value>:"`, returning the value
pub fn decode<'a>(expected: &str, field: &'a str) -> Result<&'a str, IdentityError> {
    let captures = CUSTOM_PROP_VALUE_RE
        .captures(field)
        .ok_or_else(|| IdentityError::Format {
            field: field.to_string(),
        })?;

    let (Some(kind), Some(value)) = (captures.get(1), captures.get(2)) else {
        return Err(IdentityError::Format {
            field: field.to_string(),
        });
    };

    if kind.as_str() != expected {
        return Err(IdentityError::TypeMismatch {
            expected: expected.to_string(),
            found: kind.as_str().to_string(),
        });
    }

    Ok(value.as_str())
}

/// Decode a field holding a numeric legacy id
pub fn decode_id(expected: &str, field: &str) -> Result<i64, IdentityError> {
    let value = decode(expected, field)?;
    value.trim().parse().map_err(|_| IdentityError::InvalidId {
        expected: expected.to_string(),
        value: value.to_string(),
    })
}

/// Decode a comma-joined id list; an empty value is the empty set
pub fn decode_id_set(expected: &str, field: &str) -> Result<BTreeSet<i64>, IdentityError> {
    let value = decode(expected, field)?;
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse().map_err(|_| IdentityError::InvalidId {
                expected: expected.to_string(),
                value: token.to_string(),
            })
        })
        .collect()
}
