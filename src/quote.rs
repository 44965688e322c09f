// quote.rs - Escaping text for literal use inside a pattern.

fn needs_escape(b: u8) -> bool {
    b.is_ascii() && !(b.is_ascii_alphanumeric() || b == b'_')
}

/// Backslash-escapes every ASCII byte outside `[A-Za-z0-9_]`.
///
/// Bytes `>= 0x80` are copied unchanged, so multi-byte characters survive.
pub fn quote_meta_bytes(s: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    for &b in s {
        if needs_escape(b) {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

/// Returns a pattern that matches `s` literally.
///
/// ```
/// use rubex::{quote_meta, Regex};
///
/// assert_eq!(quote_meta("日本語+"), r"日本語\+");
/// let re = Regex::new(&quote_meta("1.5*[x]")).unwrap();
/// assert!(re.is_match_str("v1.5*[x]"));
/// assert!(!re.is_match_str("v105x"));
/// ```
pub fn quote_meta(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for ch in s.chars() {
        if ch.is_ascii() && needs_escape(ch as u8) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
