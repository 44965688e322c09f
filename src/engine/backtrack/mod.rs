// engine/backtrack/mod.rs - Reference matcher.
//
// Parse, compile to a small instruction set, and run a backtracking VM over
// UTF-8 text. Syntax follows Oniguruma's Ruby flavour closely enough for
// everyday patterns; see the crate docs for the supported constructs.

mod compile;
mod exec;
pub mod messages;
mod parse;

use compile::{compile, Inst};
use parse::{parse, Assertion};

use crate::error::RegexError;
use crate::options::Options;
use crate::region::Region;

use super::{Engine, Program};

pub use exec::DEFAULT_RETRY_LIMIT_IN_MATCH;
pub use parse::{DEFAULT_PARSE_DEPTH_LIMIT, MAX_REPEAT};

/// The default engine.
///
/// ```
/// use rubex::engine::backtrack::Backtrack;
/// use rubex::engine::{Engine, Program};
/// use rubex::Options;
///
/// let prog = Backtrack.compile(r"(\w+)@(\w+)", Options::DEFAULT).unwrap();
/// let region = prog.search(b"mail bob@example now", 0).unwrap();
/// assert_eq!(region.get(0), Some(5..16));
/// assert_eq!(region.get(2), Some(9..16));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Backtrack;

impl Engine for Backtrack {
    fn compile(&self, pattern: &str, options: Options) -> Result<Box<dyn Program>, RegexError> {
        Ok(Box::new(BacktrackProgram::new(pattern, options)?))
    }
}

/// A pattern compiled by [`Backtrack`].
#[derive(Debug)]
pub struct BacktrackProgram {
    insts: Vec<Inst>,
    num_groups: usize,
    num_regs: usize,
    names: Vec<(String, usize)>,
    ascii: bool,
    longest: bool,
    retry_limit: u64,
    // first instruction is an ASCII literal
    prefix: Option<u8>,
    // first instruction is `\A` or `\G`
    anchored: bool,
}

impl BacktrackProgram {
    pub fn new(pattern: &str, options: Options) -> Result<Self, RegexError> {
        let ascii = options.contains(Options::ASCII_RANGE);
        let ast = parse(pattern, options)?;
        let compiled = compile(&ast, ascii, pattern)?;
        let (prefix, anchored) = match compiled.insts.get(1) {
            Some(Inst::Char(c)) if c.is_ascii() => (Some(*c as u8), false),
            Some(Inst::Assert(Assertion::TextStart | Assertion::SearchStart)) => (None, true),
            _ => (None, false),
        };
        Ok(BacktrackProgram {
            insts: compiled.insts,
            num_groups: ast.num_groups,
            num_regs: compiled.num_regs,
            names: ast.names,
            ascii,
            longest: options.contains(Options::FIND_LONGEST),
            retry_limit: DEFAULT_RETRY_LIMIT_IN_MATCH,
            prefix,
            anchored,
        })
    }

    /// Replaces the per-position backtrack budget.
    pub fn with_retry_limit(mut self, limit: u64) -> Self {
        self.retry_limit = limit;
        self
    }
}

impl Program for BacktrackProgram {
    fn search(&self, text: &[u8], start: usize) -> Option<Region> {
        exec::search(self, text, start)
    }

    fn captures_len(&self) -> usize {
        self.num_groups
    }

    fn names(&self) -> Vec<(String, usize)> {
        self.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pattern: &str, options: Options, text: &str) -> Option<Vec<Option<(usize, usize)>>> {
        let prog = BacktrackProgram::new(pattern, options).unwrap();
        prog.search(text.as_bytes(), 0)
            .map(|r| r.iter().map(|s| s.map(|s| (s.start, s.end))).collect())
    }

    fn m(pattern: &str, text: &str) -> Option<(usize, usize)> {
        spans(pattern, Options::DEFAULT, text).and_then(|s| s[0])
    }

    #[test]
    fn leftmost_first() {
        assert_eq!(m("a|ab", "xab"), Some((1, 2)));
        assert_eq!(m("a+", "baaa"), Some((1, 4)));
        assert_eq!(m("a+?", "baaa"), Some((1, 2)));
        assert_eq!(m("x", "abc"), None);
    }

    #[test]
    fn longest_mode() {
        let s = spans("a|ab", Options::FIND_LONGEST, "xab").unwrap();
        assert_eq!(s[0], Some((1, 3)));
    }

    #[test]
    fn groups_and_unset() {
        let s = spans("(a)|(b)", Options::DEFAULT, "b").unwrap();
        assert_eq!(s, vec![Some((0, 1)), None, Some((0, 1))]);
        let s = spans("(a*)b", Options::DEFAULT, "b").unwrap();
        assert_eq!(s, vec![Some((0, 1)), Some((0, 0))]);
    }

    #[test]
    fn last_iteration_wins() {
        let s = spans("(?:(a)|b)+", Options::DEFAULT, "ab").unwrap();
        assert_eq!(s, vec![Some((0, 2)), Some((0, 1))]);
        let s = spans("(\\w)+", Options::DEFAULT, "xyz").unwrap();
        assert_eq!(s[1], Some((2, 3)));
    }

    #[test]
    fn empty_loops_terminate() {
        assert_eq!(m("(a*)*", "aab"), Some((0, 2)));
        assert_eq!(m("(a?)+b", "b"), Some((0, 1)));
        assert_eq!(m("(?:)*", "x"), Some((0, 0)));
    }

    #[test]
    fn anchors() {
        assert_eq!(m("^b", "ab"), None);
        assert_eq!(m("a$", "a\n"), None);
        assert_eq!(spans("^b$", Options::MULTILINE, "a\nb\nc").unwrap()[0], Some((2, 3)));
        assert_eq!(m(r"a\Z", "a\n"), Some((0, 1)));
        assert_eq!(m(r"\bfoo\b", "a foo."), Some((2, 5)));
        assert_eq!(m(r"\Bo", "foo"), Some((1, 2)));
    }

    #[test]
    fn search_start_anchor() {
        let prog = BacktrackProgram::new(r"\Gb", Options::DEFAULT).unwrap();
        assert!(prog.search(b"ab", 0).is_none());
        assert_eq!(prog.search(b"ab", 1).and_then(|r| r.get(0)), Some(1..2));
    }

    #[test]
    fn utf8_steps_by_char() {
        assert_eq!(m(".", "日本"), Some((0, 3)));
        assert_eq!(m("本", "日本"), Some((3, 6)));
        assert_eq!(m(r"\p{Han}+", "xx日本語yy"), Some((2, 11)));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(spans("hello", Options::IGNORECASE, "Say HELLO").unwrap()[0], Some((4, 9)));
        assert_eq!(spans("[a-c]+", Options::IGNORECASE, "xABCx").unwrap()[0], Some((1, 4)));
        assert_eq!(spans("é", Options::IGNORECASE, "É").unwrap()[0], Some((0, 2)));
        assert_eq!(spans("é", Options::IGNORECASE | Options::ASCII_RANGE, "É"), None);
    }

    #[test]
    fn ascii_range_word() {
        assert_eq!(m(r"\w+", "é1"), Some((0, 3)));
        assert_eq!(spans(r"\w+", Options::ASCII_RANGE, "é1").unwrap()[0], Some((2, 3)));
    }

    #[test]
    fn lookahead_and_atomic() {
        assert_eq!(m("foo(?=bar)", "foobaz foobar"), Some((7, 10)));
        assert_eq!(m("foo(?!bar)", "foobar foobaz"), Some((7, 10)));
        assert_eq!(m("(?>a+)a", "aaa"), None);
        assert_eq!(m("a++a", "aaa"), None);
        assert_eq!(m("a*+b", "aab"), Some((0, 3)));
    }

    #[test]
    fn backrefs() {
        assert_eq!(m(r"(a+)b\1", "aabaa"), Some((0, 5)));
        assert_eq!(m(r"(?<q>['])x\k<q>", "'x'"), Some((0, 3)));
        assert_eq!(spans(r"(a)\1", Options::IGNORECASE, "aA").unwrap()[0], Some((0, 2)));
        assert_eq!(m(r"(?:(a)|b)\1", "b"), None);
    }

    #[test]
    fn counted_repeats() {
        assert_eq!(m("a{2,3}", "aaaa"), Some((0, 3)));
        assert_eq!(m("a{2}", "a"), None);
        assert_eq!(m("a{2,}", "aaaa"), Some((0, 4)));
        assert_eq!(m("a{,2}", "aaa"), Some((0, 2)));
    }

    #[test]
    fn retry_limit_gives_up() {
        let prog = BacktrackProgram::new("(a*)*b", Options::DEFAULT)
            .unwrap()
            .with_retry_limit(1000);
        assert!(prog.search("a".repeat(40).as_bytes(), 0).is_none());
    }

    #[test]
    fn invalid_utf8_is_searchable() {
        let prog = BacktrackProgram::new("b", Options::DEFAULT).unwrap();
        assert_eq!(prog.search(&[0xff, b'b'], 0).and_then(|r| r.get(0)), Some(1..2));
    }

    #[test]
    fn names_are_reported() {
        let prog = BacktrackProgram::new("(?<a>x)(y)(?<a>z)", Options::DEFAULT).unwrap();
        assert_eq!(prog.captures_len(), 3);
        assert_eq!(prog.names(), vec![("a".to_string(), 1), ("a".to_string(), 3)]);
    }
}
