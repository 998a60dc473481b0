//! Listing pipeline: marker and prefix filtering, truncation, and
//! delimiter roll-up.
//!
//! The pipeline operates on a name-ordered map of entries, which gives the
//! result sorted-set semantics for free: natural string ordering, no
//! duplicate names. Order of the steps is significant: marker and prefix
//! filtering run on the full sorted set, truncation runs after filtering,
//! and roll-up runs on the truncated page.

use nimbus_core::{BlobMetadata, StorageMetadata};
use std::collections::{BTreeMap, BTreeSet};

/// Marker suffix some providers use for synthetic folder placeholders.
const FOLDER_SUFFIX: &str = "_$folder$";

/// Content type conventionally given to directory placeholder blobs.
const DIRECTORY_CONTENT_TYPE: &str = "application/directory";

/// If the blob is a directory placeholder, return the directory name it
/// stands for.
///
/// A placeholder is recognized by a trailing `/` or `_$folder$` marker on
/// the key, or by the `application/directory` content type.
pub(crate) fn directory_marker_name(md: &BlobMetadata) -> Option<String> {
    if let Some(stripped) = md.name.strip_suffix('/') {
        return Some(stripped.to_string());
    }
    if let Some(stripped) = md.name.strip_suffix(FOLDER_SUFFIX) {
        return Some(stripped.to_string());
    }
    if md.content.content_type.as_deref() == Some(DIRECTORY_CONTENT_TYPE) {
        return Some(md.name.clone());
    }
    None
}

/// Drop every entry whose name is lexicographically at or below the marker.
pub(crate) fn apply_marker(entries: &mut BTreeMap<String, StorageMetadata>, marker: &str) {
    let mut tail = entries.split_off(marker);
    tail.remove(marker);
    *entries = tail;
}

/// Keep only entries under the prefix, never the prefix itself.
pub(crate) fn apply_prefix(entries: &mut BTreeMap<String, StorageMetadata>, prefix: &str) {
    entries.retain(|name, _| name.starts_with(prefix) && name != prefix);
}

/// Truncate to at most `max_results` entries.
///
/// Returns the continuation marker, the name of the last kept entry, when
/// truncation removed at least one entry, and `None` otherwise. A page that
/// ends exactly at the end of the namespace therefore returns no marker.
pub(crate) fn truncate(
    entries: &mut BTreeMap<String, StorageMetadata>,
    max_results: usize,
) -> Option<String> {
    if entries.len() <= max_results {
        return None;
    }
    let first_dropped = entries.keys().nth(max_results).cloned()?;
    entries.split_off(&first_dropped);
    entries.keys().next_back().cloned()
}

/// Delimiter roll-up: hide entries nested below a common prefix and show one
/// synthetic directory entry per distinct common prefix.
///
/// Prefix matching happens on the prefix-then-delimiter boundary; a prefix
/// that already ends with the delimiter is not doubled. Synthetic entries
/// are named by the prefix-stripped first path segment.
pub(crate) fn roll_up(
    entries: &mut BTreeMap<String, StorageMetadata>,
    prefix: Option<&str>,
    delimiter: char,
) {
    let to_match = prefix.map(|p| {
        if p.ends_with(delimiter) {
            p.to_string()
        } else {
            format!("{}{}", p, delimiter)
        }
    });

    let mut kept = BTreeMap::new();
    let mut common_prefixes = BTreeSet::new();
    for (name, md) in std::mem::take(entries) {
        match &to_match {
            None => {
                if let Some(idx) = name.find(delimiter) {
                    common_prefixes.insert(name[..idx].to_string());
                } else {
                    kept.insert(name, md);
                }
            }
            Some(to_match) => {
                if let Some(stripped) = name.strip_prefix(to_match.as_str()) {
                    if stripped.is_empty() {
                        // the entry is the prefix boundary itself, hidden
                    } else if let Some(idx) = stripped.find(delimiter) {
                        common_prefixes.insert(stripped[..idx].to_string());
                    } else {
                        kept.insert(name, md);
                    }
                } else if let Some(idx) = name.find(delimiter) {
                    common_prefixes.insert(name[..idx].to_string());
                }
                // flat entries outside the prefix boundary are hidden
            }
        }
    }

    for common in common_prefixes {
        kept.entry(common.clone())
            .or_insert_with(|| StorageMetadata::relative_path(common));
    }
    *entries = kept;
}
