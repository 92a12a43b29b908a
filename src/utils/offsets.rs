//! Offset conversion between JavaScript and Rust strings
//!
//! JavaScript reports caret positions in UTF-16 code units; the core works
//! in UTF-8 byte offsets. Out-of-range offsets clamp to the end of the text,
//! and offsets that fall inside a character snap to that character's start.

/// Convert a UTF-16 code unit offset to a byte offset
pub fn utf16_to_byte_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > utf16_offset {
            return byte_index;
        }
        units = next;
    }
    text.len()
}

/// Convert a byte offset to a UTF-16 code unit offset
pub fn byte_to_utf16_offset(text: &str, byte_offset: usize) -> usize {
    let mut byte_offset = byte_offset.min(text.len());
    while !text.is_char_boundary(byte_offset) {
        byte_offset -= 1;
    }
    text[..byte_offset].chars().map(char::len_utf16).sum()
}
