//! ACL conversion
//!
//! Maps a legacy `(visibility, acl)` pair to the normalized, comma-joined
//! permission list stored in the `sms_acl` custom property. Entries are one of
//! `WORLD`, `CAM`, `INST_<id>`, `GROUP_<id>` or `USER_<crsid>`.

use crate::institutions::is_institution;
use core_catalog::Visibility;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static CRSID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+[0-9]+$").expect("CRSID pattern is valid"));

/// An ACL with no entries, or only a single blank entry, is empty
fn is_empty_acl(acl: &[String]) -> bool {
    match acl {
        [] => true,
        [only] => only.is_empty(),
        _ => false,
    }
}

/// Convert a legacy visibility and ACL to the normalized form
///
/// Never fails. Entries that cannot be classified are logged and dropped.
pub fn convert_acl(visibility: Visibility, acl: &[String]) -> String {
    let empty = is_empty_acl(acl);
    let mut entries = Vec::with_capacity(acl.len() + 1);

    match visibility {
        Visibility::WorldOverrule => entries.push("WORLD".to_string()),
        Visibility::World if empty => entries.push("WORLD".to_string()),
        Visibility::CamOverrule => entries.push("CAM".to_string()),
        Visibility::Cam if empty => entries.push("CAM".to_string()),
        _ => {}
    }

    if !empty {
        for ace in acl {
            if !ace.is_empty() && ace.chars().all(|c| c.is_ascii_digit()) {
                entries.push(format!("GROUP_{}", ace));
            } else if is_institution(ace) {
                entries.push(format!("INST_{}", ace.to_uppercase()));
            } else if CRSID_PATTERN.is_match(ace) {
                entries.push(format!("USER_{}", ace));
            } else {
                warn!(ace = %ace, "ACE cannot be resolved");
            }
        }
    }

    entries.join(",")
}
