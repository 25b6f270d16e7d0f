//! Identity tags: the durable link between cards and projects
//!
//! A card belongs to a project because its text says so. The tag
//! `projectId:<id>` lives in the card's content where humans rarely touch
//! it; positions, titles, and stored item ids are all expendable. Early
//! boards put the tag in the visible title instead, so extraction still
//! accepts either location and the sync loop migrates stragglers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::project::ProjectId;

/// Prefix of every identity tag
pub const TAG_PREFIX: &str = "projectId:";

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"projectId:([A-Za-z0-9_-]+)").expect("tag pattern"));

/// Render the tag for a project
#[inline]
#[must_use]
pub fn embed(id: &ProjectId) -> String {
    format!("{TAG_PREFIX}{id}")
}

/// First identity tag found in `text`
#[must_use]
pub fn extract(text: &str) -> Option<ProjectId> {
    TAG.captures(text)
        .map(|caps| ProjectId::new(&caps[1]))
}

/// Whether any tag in `text` names exactly `id`
///
/// Substring search is not enough: `projectId:p1` is a prefix of
/// `projectId:p12`, so each captured id is compared whole.
#[must_use]
pub fn matches(text: &str, id: &ProjectId) -> bool {
    TAG.captures_iter(text).any(|caps| &caps[1] == id.as_str())
}

/// Remove every tag from `text` and tidy the leftover whitespace
#[must_use]
pub fn strip(text: &str) -> String {
    let cleaned = TAG.replace_all(text, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Marker for engine-owned furniture (separators, headers, overlays)
#[inline]
#[must_use]
pub fn furniture(kind: &str) -> String {
    format!("easel:{kind}")
}

/// Whether `text` carries the furniture marker for `kind`
#[inline]
#[must_use]
pub fn is_furniture(text: &str, kind: &str) -> bool {
    text.contains(&furniture(kind))
}
