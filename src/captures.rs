// captures.rs - Match and capture views over the searched text.
//
// Nothing here can fail: unset groups, unknown names and out-of-range
// indices all come back as `None`.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::names::NameTable;
use crate::region::Region;

// === Match ===

/// A single span of the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t [u8],
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    pub(crate) fn new(text: &'t [u8], range: Range<usize>) -> Self {
        Match {
            text,
            start: range.start,
            end: range.end,
        }
    }

    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range of the match.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text as a byte slice.
    pub fn as_bytes(&self) -> &'t [u8] {
        &self.text[self.start..self.end]
    }

    /// The matched text as UTF-8, with invalid sequences replaced by U+FFFD.
    pub fn as_str(&self) -> Cow<'t, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Returns the length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the match is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === CaptureLookup ===

/// Group access used by template expansion.
pub trait CaptureLookup {
    /// Text of group `index`; `None` if unset or out of range.
    fn group(&self, index: usize) -> Option<&[u8]>;

    /// Text of the first participating group named `name`.
    fn named(&self, name: &str) -> Option<&[u8]>;
}

/// Positional groups only; every name lookup misses.
impl CaptureLookup for [Option<&[u8]>] {
    fn group(&self, index: usize) -> Option<&[u8]> {
        self.get(index).copied().flatten()
    }

    fn named(&self, _name: &str) -> Option<&[u8]> {
        None
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. When several groups share a name,
/// [`Captures::name`] resolves to the first of them that took part in this
/// match.
///
/// ```
/// use rubex::Regex;
///
/// let re = Regex::new(r"(?<x>a)|(?<x>b)").unwrap();
/// let caps = re.captures(b"b").unwrap();
/// assert_eq!(caps.name("x").unwrap().as_bytes(), b"b");
/// assert!(caps.get(1).is_none());
/// ```
pub struct Captures<'t> {
    text: &'t [u8],
    region: Region,
    names: Arc<NameTable>,
}

impl<'t> Captures<'t> {
    pub(crate) fn new(text: &'t [u8], region: Region, names: Arc<NameTable>) -> Self {
        Captures { text, region, names }
    }

    /// Get capture group `i`, or `None` if the group did not participate.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let range = self.region.get(i)?;
        if range.end > self.text.len() {
            return None;
        }
        Some(Match::new(self.text, range))
    }

    /// Get the first participating group with the given name.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        self.names.indices(name).iter().find_map(|&i| self.get(i))
    }

    /// Number of groups, group 0 included.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Iterate over all capture groups.
    pub fn iter(&self) -> SubCaptures<'_, 't> {
        SubCaptures {
            captures: self,
            index: 0,
        }
    }

    /// The raw spans.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// The raw spans, without the text borrow.
    pub fn into_region(self) -> Region {
        self.region
    }

    /// One slice per group, `None` for unset ones.
    pub fn to_slices(&self) -> Vec<Option<&'t [u8]>> {
        self.iter().map(|m| m.map(|m| m.as_bytes())).collect()
    }
}

impl CaptureLookup for Captures<'_> {
    fn group(&self, index: usize) -> Option<&[u8]> {
        self.get(index).map(|m| m.as_bytes())
    }

    fn named(&self, name: &str) -> Option<&[u8]> {
        self.name(name).map(|m| m.as_bytes())
    }
}

impl fmt::Debug for Captures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for m in self.iter() {
            list.entry(&m.map(|m| m.range()));
        }
        list.finish()
    }
}

// === SubCaptures ===

/// Iterator over the groups of a [`Captures`].
pub struct SubCaptures<'c, 't> {
    captures: &'c Captures<'t>,
    index: usize,
}

impl<'c, 't> Iterator for SubCaptures<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SubCaptures<'_, '_> {}
