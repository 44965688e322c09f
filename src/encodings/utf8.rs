// encodings/utf8.rs - UTF-8 character stepping.
//
// Buffers handed to the API are arbitrary bytes. Every byte sequence that is
// not a well-formed UTF-8 character is treated as a one-byte character so that
// stepping always makes progress.

use std::char::REPLACEMENT_CHARACTER;

#[inline]
fn utf8_istail(c: u8) -> bool {
    (c & 0xc0) == 0x80
}

// Maps a lead byte to the length of the sequence it announces.
// Bytes that can never start a sequence map to 1.
static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Decodes the character starting at `pos`.
///
/// Returns the character and its width in bytes, or `None` at the end of the
/// buffer. Malformed sequences decode as U+FFFD with width 1.
#[inline]
pub fn decode(text: &[u8], pos: usize) -> Option<(char, usize)> {
    let lead = *text.get(pos)?;
    if lead < 0x80 {
        return Some((lead as char, 1));
    }
    let len = ENC_LEN_UTF8[lead as usize] as usize;
    if len > 1 {
        if let Some(ch) = text
            .get(pos..pos + len)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|s| s.chars().next())
        {
            return Some((ch, len));
        }
    }
    Some((REPLACEMENT_CHARACTER, 1))
}

/// Width in bytes of the character starting at `pos`; 0 at the end of the
/// buffer.
#[inline]
pub fn char_len(text: &[u8], pos: usize) -> usize {
    decode(text, pos).map_or(0, |(_, len)| len)
}

/// Decodes the character that ends right before `pos`.
///
/// Walks back over at most three continuation bytes. If the bytes found do not
/// form one well-formed character ending exactly at `pos`, the single byte
/// before `pos` is returned as U+FFFD.
pub fn decode_prev(text: &[u8], pos: usize) -> Option<(char, usize)> {
    if pos == 0 || pos > text.len() {
        return None;
    }
    let mut head = pos - 1;
    while head > 0 && pos - head < 4 && utf8_istail(text[head]) {
        head -= 1;
    }
    match decode(text, head) {
        Some((ch, len)) if head + len == pos => Some((ch, len)),
        _ => {
            let last = text[pos - 1];
            if last < 0x80 {
                Some((last as char, 1))
            } else {
                Some((REPLACEMENT_CHARACTER, 1))
            }
        }
    }
}
