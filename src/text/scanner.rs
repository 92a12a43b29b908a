//! String-aware JSON text scanning
//!
//! Finds the top-level `features` array and the spans of its object
//! elements by walking raw bytes. All structural JSON characters are ASCII,
//! so byte offsets are always on `char` boundaries when they land on one.
//! Nothing here allocates or caches: each call re-reads the text as it is now.

use serde::{Deserialize, Serialize};

/// The text span one element of the `features` array occupies
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureLocation {
    /// Position of the element in the array, counting object elements only
    pub feature_index: usize,
    /// Offset of the opening `{`
    pub start_offset: usize,
    /// One past the closing `}`
    pub end_offset: usize,
}

impl FeatureLocation {
    /// Whether `offset` lies on or between the element's braces
    pub fn contains(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset < self.end_offset
    }
}

/// Tracks whether the scan is inside a string literal
#[derive(Default, Clone, Copy, Debug)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Feed one byte; returns true if the byte belongs to a string literal
    /// (including its quotes) and must not be read as structure.
    fn feed(&mut self, byte: u8) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            } else if byte == b'"' {
                self.in_string = false;
            }
            return true;
        }
        if byte == b'"' {
            self.in_string = true;
            return true;
        }
        false
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

/// Offset of the `[` that opens the top-level `features` array
///
/// Only a `"features"` key that is a direct member of the outermost object
/// counts; the same word inside a string value or a nested object is skipped.
pub fn find_features_array(text: &str) -> Option<usize> {
    find_top_level_value(text, "features", b"[")
}

/// Whether the outermost object has `"type": "FeatureCollection"`
///
/// Works on text that is not valid JSON as a whole, e.g. mid-edit.
pub fn is_feature_collection(text: &str) -> bool {
    find_top_level_value(text, "type", b"\"FeatureCollection\"").is_some()
}

/// Offset of the value of a direct member `key` of the outermost object,
/// taking the first such member whose value text starts with `prefix`
fn find_top_level_value(text: &str, key: &str, prefix: &[u8]) -> Option<usize> {
    let bytes = text.as_bytes();
    let key = key.as_bytes();
    let mut strings = StringState::default();
    let mut depth = 0usize;

    for (pos, &byte) in bytes.iter().enumerate() {
        let was_in_string = strings.in_string;
        if strings.feed(byte) {
            if !was_in_string && depth == 1 && is_quoted_at(bytes, pos, key) {
                let colon = skip_whitespace(bytes, pos + key.len() + 2);
                if bytes.get(colon) == Some(&b':') {
                    let value = skip_whitespace(bytes, colon + 1);
                    if bytes[value..].starts_with(prefix) {
                        return Some(value);
                    }
                }
            }
            continue;
        }
        match byte {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn is_quoted_at(bytes: &[u8], pos: usize, word: &[u8]) -> bool {
    bytes[pos + 1..].starts_with(word) && bytes.get(pos + 1 + word.len()) == Some(&b'"')
}

/// Nesting depth at `offset` when scanning from `from`
///
/// Returns `None` if `offset` lies inside a string literal. Scanning from an
/// element's opening brace, its own members sit at depth 1.
pub fn depth_at(text: &str, from: usize, offset: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut strings = StringState::default();
    let mut depth = 0usize;

    for &byte in bytes.get(from..offset.min(bytes.len()))? {
        if strings.feed(byte) {
            continue;
        }
        match byte {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    (!strings.in_string).then_some(depth)
}

/// Iterator over the object elements of a JSON array
///
/// Yields one [`FeatureLocation`] per `{`..`}` pair at the array's own
/// nesting level, and stops at the array's closing `]`. A trailing element
/// that is never closed is not yielded.
pub struct FeatureSpans<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    strings: StringState,
    next_index: usize,
    element_start: Option<usize>,
    done: bool,
}

impl<'a> FeatureSpans<'a> {
    /// Scan the array whose `[` is at `array_open`
    pub fn new(text: &'a str, array_open: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: array_open + 1,
            depth: 0,
            strings: StringState::default(),
            next_index: 0,
            element_start: None,
            done: false,
        }
    }
}

impl Iterator for FeatureSpans<'_> {
    type Item = FeatureLocation;

    fn next(&mut self) -> Option<FeatureLocation> {
        if self.done {
            return None;
        }

        while self.pos < self.bytes.len() {
            let pos = self.pos;
            let byte = self.bytes[pos];
            self.pos += 1;

            if self.strings.feed(byte) {
                continue;
            }

            match byte {
                b'{' => {
                    if self.depth == 0 {
                        self.element_start = Some(pos);
                    }
                    self.depth += 1;
                }
                b'[' => self.depth += 1,
                b'}' | b']' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 && byte == b'}' {
                        if let Some(start) = self.element_start.take() {
                            let location = FeatureLocation {
                                feature_index: self.next_index,
                                start_offset: start,
                                end_offset: pos + 1,
                            };
                            self.next_index += 1;
                            return Some(location);
                        }
                    }
                }
                // Closing bracket at depth 0 ends the array itself
                b']' => {
                    self.done = true;
                    return None;
                }
                _ => {}
            }
        }

        self.done = true;
        None
    }
}

/// All object element spans of the top-level `features` array
pub fn feature_spans(text: &str) -> Vec<FeatureLocation> {
    match find_features_array(text) {
        Some(open) => FeatureSpans::new(text, open).collect(),
        None => Vec::new(),
    }
}
