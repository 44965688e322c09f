// options.rs - Compile options.
//
// A closed set of flags consumed once, when a pattern is compiled. Engines
// receive the full set; the ones they cannot honour are ignored.

use bitflags::bitflags;

bitflags! {
    /// Options applied when compiling a [`Regex`](crate::Regex).
    ///
    /// ```
    /// use rubex::{Options, Regex};
    ///
    /// let re = Regex::with_options(r"^hello$", Options::IGNORECASE | Options::MULTILINE).unwrap();
    /// assert!(re.is_match_str("bye\nHELLO\n"));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Options: u32 {
        /// Case-insensitive matching.
        const IGNORECASE = 1;
        /// `^` and `$` match at line boundaries, not only at the text edges.
        const MULTILINE = 1 << 1;
        /// Prefer the leftmost-longest match over the leftmost-first one.
        const FIND_LONGEST = 1 << 2;
        /// Character types (`\w`, `\d`, `\s`, `\b`, POSIX brackets) and case
        /// folding only consider ASCII.
        const ASCII_RANGE = 1 << 3;
    }
}

impl Options {
    /// No options: case-sensitive, single-line, leftmost-first, Unicode.
    pub const DEFAULT: Options = Options::empty();
}
