// region.rs - Capture spans of a single match.
//
// One slot per group, group 0 included. A slot is `None` when its group did
// not take part in the match.

use std::ops::Range;

use smallvec::SmallVec;

/// Offset used for unset groups in the flat [`Region::to_offsets`] form.
pub const REGION_NOTPOS: isize = -1;

/// Byte spans of every group of one match.
///
/// Slot 0 is the whole match and is always set for a region returned by a
/// search. For every set slot `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    spans: SmallVec<[Option<(usize, usize)>; 8]>,
}

impl Region {
    /// A region with `num_regs` unset slots.
    pub fn new(num_regs: usize) -> Self {
        let mut spans = SmallVec::with_capacity(num_regs);
        spans.resize(num_regs, None);
        Region { spans }
    }

    /// Number of slots, group 0 included.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Span of group `i`, or `None` when it is unset or out of range.
    pub fn get(&self, i: usize) -> Option<Range<usize>> {
        self.spans.get(i).copied().flatten().map(|(s, e)| s..e)
    }

    /// Sets slot `i`, growing the region if needed. A reversed span is stored
    /// as unset.
    pub fn set(&mut self, i: usize, span: Option<(usize, usize)>) {
        if i >= self.spans.len() {
            self.spans.resize(i + 1, None);
        }
        self.spans[i] = span.filter(|&(s, e)| s <= e);
    }

    /// Clears every slot without changing the slot count.
    pub fn clear(&mut self) {
        self.spans.iter_mut().for_each(|s| *s = None);
    }

    /// Start of the whole match. Zero for an empty region.
    pub fn start(&self) -> usize {
        self.get(0).map_or(0, |r| r.start)
    }

    /// End of the whole match. Zero for an empty region.
    pub fn end(&self) -> usize {
        self.get(0).map_or(0, |r| r.end)
    }

    /// Flat `[start0, end0, start1, end1, ...]` form with
    /// [`REGION_NOTPOS`] for unset groups.
    pub fn to_offsets(&self) -> Vec<isize> {
        let mut out = Vec::with_capacity(self.spans.len() * 2);
        for span in &self.spans {
            match span {
                Some((s, e)) => {
                    out.push(*s as isize);
                    out.push(*e as isize);
                }
                None => {
                    out.push(REGION_NOTPOS);
                    out.push(REGION_NOTPOS);
                }
            }
        }
        out
    }

    /// Iterates over every slot in group order.
    pub fn iter(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        self.spans.iter().map(|s| s.map(|(s, e)| s..e))
    }
}
