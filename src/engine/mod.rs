// engine/mod.rs - Matcher capability.
//
// The API layer never looks inside a compiled program. It needs two things:
// compile a pattern, and search a buffer from an offset. Anything that can do
// both can back a `Regex`.

pub mod backtrack;

use crate::error::RegexError;
use crate::options::Options;
use crate::region::Region;

/// A pattern compiler.
///
/// Calls to [`Engine::compile`] made through [`Regex`](crate::Regex) are
/// serialized by a process-wide lock, so implementations need not be
/// reentrant-safe during compilation.
pub trait Engine: Send + Sync {
    /// Compiles `pattern`. Errors carry the engine's own diagnostic text.
    fn compile(&self, pattern: &str, options: Options) -> Result<Box<dyn Program>, RegexError>;
}

/// A compiled pattern.
///
/// Searches run without any lock held and may run concurrently on the same
/// program.
pub trait Program: Send + Sync {
    /// Finds the leftmost match starting at or after `start`.
    ///
    /// The returned region has [`Program::captures_len`]` + 1` slots with slot
    /// 0 set. `start` is a character boundary when `text` is valid UTF-8.
    fn search(&self, text: &[u8], start: usize) -> Option<Region>;

    /// Number of capturing groups, not counting group 0.
    fn captures_len(&self) -> usize;

    /// Every `(name, group index)` binding. A name appears once per group it
    /// labels.
    fn names(&self) -> Vec<(String, usize)>;

    /// Whether a match starts at or after `start`.
    ///
    /// Backs [`Regex::is_match`](crate::Regex::is_match). The default runs a
    /// full search; engines that can answer without filling capture slots
    /// may override it.
    fn is_match(&self, text: &[u8], start: usize) -> bool {
        self.search(text, start).is_some()
    }
}
