// find.rs - All-matches cursor and the find family.
//
// Every multi-match operation goes through `Matches`, which turns the
// engine's single-match search into an ordered, non-overlapping sequence.
// After an empty match the cursor steps over one character so the scan always
// makes progress and never lands inside a UTF-8 sequence.

use std::ops::Range;

use tracing::trace;

use crate::captures::{Captures, Match};
use crate::encodings::utf8::char_len;
use crate::region::Region;
use crate::regex::Regex;

// === Matches ===

/// Lazy iterator over the match regions of one buffer.
///
/// A negative `limit` is unbounded; zero yields nothing.
pub struct Matches<'r, 't> {
    regex: &'r Regex,
    text: &'t [u8],
    offset: usize,
    remaining: isize,
    done: bool,
}

impl<'r, 't> Matches<'r, 't> {
    fn new(regex: &'r Regex, text: &'t [u8], limit: isize) -> Self {
        Matches {
            regex,
            text,
            offset: 0,
            remaining: limit,
            done: false,
        }
    }
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        if self.done || self.remaining == 0 || self.offset > self.text.len() {
            return None;
        }
        let region = match self.regex.search(self.text, self.offset) {
            Some(region) => region,
            None => {
                self.done = true;
                return None;
            }
        };
        let span = match region.get(0) {
            Some(span) if span.start >= self.offset && span.end <= self.text.len() => span,
            _ => {
                // an engine reporting a span behind the cursor would loop forever
                self.done = true;
                return None;
            }
        };
        trace!(offset = self.offset, start = span.start, end = span.end, "cursor step");
        self.offset = span.end;
        if span.is_empty() {
            if span.end < self.text.len() {
                self.offset += char_len(self.text, span.end).max(1);
            } else {
                self.done = true;
            }
        }
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        Some(region)
    }
}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
pub struct FindIter<'r, 't> {
    inner: Matches<'r, 't>,
}

impl<'r, 't> Iterator for FindIter<'r, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Match<'t>> {
        let region = self.inner.next()?;
        let span = region.get(0)?;
        Some(Match::new(self.inner.text, span))
    }
}

// === CaptureMatches ===

/// Iterator over the [`Captures`] of all non-overlapping matches.
pub struct CaptureMatches<'r, 't> {
    inner: Matches<'r, 't>,
}

impl<'r, 't> Iterator for CaptureMatches<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Captures<'t>> {
        let region = self.inner.next()?;
        Some(Captures::new(self.inner.text, region, self.inner.regex.names().clone()))
    }
}

fn slices<'t>(text: &'t [u8], region: &Region) -> Vec<Option<&'t [u8]>> {
    region.iter().map(|span| span.and_then(|r| text.get(r))).collect()
}

fn str_slices<'t>(text: &'t str, region: &Region) -> Vec<Option<&'t str>> {
    region.iter().map(|span| span.and_then(|r| text.get(r))).collect()
}

impl Regex {
    /// Iterate over the match regions of `text`, at most `limit` of them.
    pub fn matches<'r, 't>(&'r self, text: &'t [u8], limit: isize) -> Matches<'r, 't> {
        Matches::new(self, text, limit)
    }

    /// Iterate over all non-overlapping matches in `text`.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new(r"\d+").unwrap();
    /// let found: Vec<_> = re.find_iter(b"1 + 22 = 333").map(|m| m.range()).collect();
    /// assert_eq!(found, vec![0..1, 4..6, 9..12]);
    /// ```
    pub fn find_iter<'r, 't>(&'r self, text: &'t [u8]) -> FindIter<'r, 't> {
        FindIter {
            inner: self.matches(text, -1),
        }
    }

    /// Iterate over the captures of all non-overlapping matches in `text`.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t [u8]) -> CaptureMatches<'r, 't> {
        CaptureMatches {
            inner: self.matches(text, -1),
        }
    }

    /// Return the first match with all capture groups, or `None`.
    pub fn captures<'t>(&self, text: &'t [u8]) -> Option<Captures<'t>> {
        let region = self.search(text, 0)?;
        Some(Captures::new(text, region, self.names().clone()))
    }

    // --- presence ---

    /// Check whether `text` matches the pattern anywhere.
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.search_is_match(text, 0)
    }

    pub fn is_match_str(&self, text: &str) -> bool {
        self.is_match(text.as_bytes())
    }

    // --- leftmost match ---

    /// Text of the leftmost match.
    pub fn find<'t>(&self, text: &'t [u8]) -> Option<&'t [u8]> {
        text.get(self.find_index(text)?)
    }

    pub fn find_str<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.find_index(text.as_bytes())?)
    }

    /// Byte range of the leftmost match.
    pub fn find_index(&self, text: &[u8]) -> Option<Range<usize>> {
        self.search(text, 0)?.get(0)
    }

    pub fn find_str_index(&self, text: &str) -> Option<Range<usize>> {
        self.find_index(text.as_bytes())
    }

    /// Leftmost match and its groups; `None` entries are unset groups.
    pub fn find_submatch<'t>(&self, text: &'t [u8]) -> Option<Vec<Option<&'t [u8]>>> {
        let region = self.search(text, 0)?;
        Some(slices(text, &region))
    }

    pub fn find_str_submatch<'t>(&self, text: &'t str) -> Option<Vec<Option<&'t str>>> {
        let region = self.search(text.as_bytes(), 0)?;
        Some(str_slices(text, &region))
    }

    /// Spans of the leftmost match and its groups.
    pub fn find_submatch_index(&self, text: &[u8]) -> Option<Region> {
        self.search(text, 0)
    }

    pub fn find_str_submatch_index(&self, text: &str) -> Option<Region> {
        self.find_submatch_index(text.as_bytes())
    }

    // --- all matches ---

    /// Texts of successive matches, at most `limit` of them.
    pub fn find_all<'t>(&self, text: &'t [u8], limit: isize) -> Vec<&'t [u8]> {
        self.find_all_index(text, limit)
            .into_iter()
            .filter_map(|r| text.get(r))
            .collect()
    }

    pub fn find_all_str<'t>(&self, text: &'t str, limit: isize) -> Vec<&'t str> {
        self.find_all_index(text.as_bytes(), limit)
            .into_iter()
            .filter_map(|r| text.get(r))
            .collect()
    }

    /// Byte ranges of successive matches, at most `limit` of them.
    pub fn find_all_index(&self, text: &[u8], limit: isize) -> Vec<Range<usize>> {
        self.matches(text, limit).filter_map(|r| r.get(0)).collect()
    }

    pub fn find_all_str_index(&self, text: &str, limit: isize) -> Vec<Range<usize>> {
        self.find_all_index(text.as_bytes(), limit)
    }

    /// Groups of successive matches, at most `limit` of them.
    pub fn find_all_submatch<'t>(&self, text: &'t [u8], limit: isize) -> Vec<Vec<Option<&'t [u8]>>> {
        self.matches(text, limit).map(|r| slices(text, &r)).collect()
    }

    pub fn find_all_str_submatch<'t>(&self, text: &'t str, limit: isize) -> Vec<Vec<Option<&'t str>>> {
        self.matches(text.as_bytes(), limit)
            .map(|r| str_slices(text, &r))
            .collect()
    }

    /// Group spans of successive matches, at most `limit` of them.
    pub fn find_all_submatch_index(&self, text: &[u8], limit: isize) -> Vec<Region> {
        self.matches(text, limit).collect()
    }

    pub fn find_all_str_submatch_index(&self, text: &str, limit: isize) -> Vec<Region> {
        self.find_all_submatch_index(text.as_bytes(), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pattern: &str, text: &str, limit: isize) -> Vec<(usize, usize)> {
        let re = Regex::new(pattern).unwrap();
        re.find_all_str_index(text, limit)
            .into_iter()
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn empty_pattern_every_position() {
        assert_eq!(spans("", "abc", -1), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(spans("", "", -1), vec![(0, 0)]);
    }

    #[test]
    fn empty_after_nonempty_is_reported() {
        assert_eq!(spans("a*", "baaab", -1), vec![(0, 0), (1, 4), (4, 4), (5, 5)]);
    }

    #[test]
    fn empty_matches_step_by_char() {
        assert_eq!(spans("", "日本", -1), vec![(0, 0), (3, 3), (6, 6)]);
        assert_eq!(spans("x*", "éx", -1), vec![(0, 0), (2, 3), (3, 3)]);
    }

    #[test]
    fn limit_bounds_results() {
        assert_eq!(spans("a", "aaaa", 2), vec![(0, 1), (1, 2)]);
        assert!(spans("a", "aaaa", 0).is_empty());
        assert_eq!(spans("a", "aaaa", -5).len(), 4);
    }

    #[test]
    fn matches_is_restartable() {
        let re = Regex::new("o").unwrap();
        let first: Vec<_> = re.matches(b"foo", -1).collect();
        let second: Vec<_> = re.matches(b"foo", -1).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn find_variants() {
        let re = Regex::new(r"(\w)(\d)?").unwrap();
        assert_eq!(re.find_str("  ab"), Some("a"));
        assert_eq!(re.find_str_index("  ab"), Some(2..3));
        assert_eq!(re.find_str_submatch("  a1"), Some(vec![Some("a1"), Some("a"), Some("1")]));
        assert_eq!(re.find_str_submatch("  ab"), Some(vec![Some("a"), Some("a"), None]));
        let region = re.find_str_submatch_index("  ab").unwrap();
        assert_eq!(region.to_offsets(), vec![2, 3, 2, 3, -1, -1]);
        assert_eq!(re.find(b"!"), None);
    }

    #[test]
    fn find_all_variants() {
        let re = Regex::new(r"a(x)?").unwrap();
        assert_eq!(re.find_all_str("axbaa", -1), vec!["ax", "a", "a"]);
        assert_eq!(re.find_all(b"axbaa", 1), vec![&b"ax"[..]]);
        assert_eq!(
            re.find_all_str_submatch("axba", -1),
            vec![vec![Some("ax"), Some("x")], vec![Some("a"), None]]
        );
        let regions = re.find_all_str_submatch_index("axba", -1);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].to_offsets(), vec![3, 4, -1, -1]);
    }

    #[test]
    fn captures_iter_names() {
        let re = Regex::new(r"(?<k>\w+)=(?<v>\w+)").unwrap();
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = re
            .captures_iter(b"a=1, b=2")
            .map(|c| {
                let k = c.name("k").unwrap().as_bytes().to_vec();
                let v = c.name("v").unwrap().as_bytes().to_vec();
                (k, v)
            })
            .collect();
        assert_eq!(pairs, vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]);
    }
}
