// split.rs - Splitting text around matches.

use std::ops::Range;

use crate::regex::Regex;

impl Regex {
    /// Byte ranges of the pieces between matches, at most `limit` of them.
    fn split_ranges(&self, text: &[u8], limit: isize) -> Vec<Range<usize>> {
        if limit == 0 {
            return Vec::new();
        }
        if !self.as_str().is_empty() && text.is_empty() {
            return vec![0..0];
        }
        let mut pieces = Vec::new();
        let mut beg = 0;
        let mut end = 0;
        for span in self.matches(text, limit).filter_map(|r| r.get(0)) {
            if limit > 0 && pieces.len() as isize == limit - 1 {
                break;
            }
            end = span.start;
            // an empty match at the very start produces no leading piece
            if span.end != 0 {
                pieces.push(beg..end);
            }
            beg = span.end;
        }
        if end != text.len() {
            pieces.push(beg..text.len());
        }
        pieces
    }

    /// Slices `text` into the pieces between matches.
    ///
    /// With `limit > 0` at most `limit` pieces are returned and the last one
    /// holds the unsplit remainder. A negative `limit` returns every piece and
    /// zero returns none.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let re = Regex::new(":").unwrap();
    /// assert_eq!(re.split_str("foo:and:bar", -1), vec!["foo", "and", "bar"]);
    /// assert_eq!(re.split_str("foo:and:bar", 2), vec!["foo", "and:bar"]);
    /// assert_eq!(re.split_str("foo:and:bar", 1), vec!["foo:and:bar"]);
    /// ```
    pub fn split<'t>(&self, text: &'t [u8], limit: isize) -> Vec<&'t [u8]> {
        self.split_ranges(text, limit)
            .into_iter()
            .filter_map(|r| text.get(r))
            .collect()
    }

    pub fn split_str<'t>(&self, text: &'t str, limit: isize) -> Vec<&'t str> {
        self.split_ranges(text.as_bytes(), limit)
            .into_iter()
            .filter_map(|r| text.get(r))
            .collect()
    }
}
