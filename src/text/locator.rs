//! Feature locator
//!
//! Maps between positions in the document text and features of the
//! top-level `features` array:
//!
//! - cursor offset → feature index (`locate_feature_containing`)
//! - feature id → offset of the feature's opening brace (`locate_feature_by_id`)
//!
//! Both are pure functions of the text. Offsets are byte offsets.

use regex::Regex;

use super::scanner::{depth_at, feature_spans, find_features_array, FeatureLocation, FeatureSpans};
use crate::models::IdLookup;

/// Index of the feature whose braces enclose `offset`
pub fn locate_feature_containing(text: &str, offset: usize) -> Option<usize> {
    locate_feature_span(text, offset).map(|loc| loc.feature_index)
}

/// Span of the feature whose braces enclose `offset`
///
/// Returns `None` when the document has no top-level `features` array, when
/// `offset` precedes the array, or when it falls between elements.
pub fn locate_feature_span(text: &str, offset: usize) -> Option<FeatureLocation> {
    let open = find_features_array(text)?;
    if offset <= open {
        return None;
    }

    FeatureSpans::new(text, open)
        .take_while(|loc| loc.start_offset <= offset)
        .find(|loc| loc.contains(offset))
}

/// Offset of the opening brace of the feature whose `"id"` is `id`
///
/// Uses [`IdLookup::Strict`].
pub fn locate_feature_by_id(text: &str, id: &str) -> Option<usize> {
    locate_feature_by_id_with(text, id, IdLookup::Strict)
}

pub fn locate_feature_by_id_with(text: &str, id: &str, mode: IdLookup) -> Option<usize> {
    let pattern = id_pattern(id)?;
    let mut matches = pattern.find_iter(text).map(|m| m.start());

    match mode {
        IdLookup::Loose => matches.find_map(|at| enclosing_object_start(text, at)),
        IdLookup::Strict => {
            let spans = feature_spans(text);
            matches.find_map(|at| {
                let span = spans.iter().find(|loc| loc.contains(at))?;
                // The key must be the element's own member, not a nested one
                (depth_at(text, span.start_offset, at) == Some(1)).then_some(span.start_offset)
            })
        }
    }
}

/// `"id"` key followed by the quoted id, any JSON whitespace around the colon
fn id_pattern(id: &str) -> Option<Regex> {
    let source = format!(r#""id"[ \t\r\n]*:[ \t\r\n]*"{}""#, regex::escape(id));
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            // Only reachable if the escaped pattern exceeds the regex size limit
            log::warn!("Cannot build id pattern for {:?}: {}", id, e);
            None
        }
    }
}

/// Walk backward from `from` to the `{` that opens the enclosing object
///
/// Braces inside strings are counted too; only loose lookups rely on this.
fn enclosing_object_start(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;

    for pos in (0..from).rev() {
        match bytes[pos] {
            b'}' => depth += 1,
            b'{' if depth == 0 => return Some(pos),
            b'{' => depth -= 1,
            _ => {}
        }
    }
    None
}
