//! Plain string handling of paths: root prefix removal, composite detection and flattening.
//!
//! None of these functions look at a tree, they only reshape the path text.

use std::borrow::Cow;

/// conventional marker a rooted path starts with eg. `$.menu.id`.
pub const ROOT_PREFIX: &str = "$.";

/// separator between the segments of a composite path.
pub const SEPARATOR: char = '.';

/// strips the root marker from `path`, returning the remainder or `path` unchanged when it is
/// not rooted.
#[inline]
pub fn remove_root_prefix(path: &str) -> &str {
    if path.starts_with(ROOT_PREFIX) {
        &path[ROOT_PREFIX.len()..]
    } else {
        path
    }
}

/// returns true when the normalized `path` has more than one segment.
#[inline]
pub fn is_composite(path: &str) -> bool {
    remove_root_prefix(path).contains(SEPARATOR)
}

/// flatten collapses a composite path into a single camel cased identifier.
///
/// The first segment is kept as is and every following segment has its first character
/// uppercased, eg. `person.home.city` becomes `personHomeCity`. Simple paths come back unchanged.
/// Different paths may flatten to the same identifier, no attempt is made to tell them apart.
pub fn flatten(path: &str) -> String {
    let mut segments = remove_root_prefix(path).split(SEPARATOR);
    let mut flat = String::from(segments.next().unwrap_or_default());
    for segment in segments {
        flat.push_str(&capitalize(segment));
    }
    flat
}

#[inline]
fn capitalize(segment: &str) -> Cow<'_, str> {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(segment),
    }
}
