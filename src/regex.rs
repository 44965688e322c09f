// regex.rs - Compiled pattern handle and builder.
//
// A `Regex` owns one engine program. Compiling and releasing programs is
// serialized through a process-wide lock; searching is not.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::engine::backtrack::Backtrack;
use crate::engine::{Engine, Program};
use crate::error::RegexError;
use crate::names::NameTable;
use crate::options::Options;
use crate::quote::quote_meta;
use crate::region::Region;

static COMPILE_LOCK: Mutex<()> = Mutex::new(());

// The lock guards no data, so a poisoned guard is as good as a clean one.
fn compile_lock() -> MutexGuard<'static, ()> {
    COMPILE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

fn default_engine() -> Arc<dyn Engine> {
    Arc::new(Backtrack)
}

/// Owns a compiled program and releases it under the compile lock.
struct ProgramHandle {
    program: Option<Box<dyn Program>>,
}

impl ProgramHandle {
    fn get(&self) -> Option<&dyn Program> {
        self.program.as_deref()
    }
}

impl Drop for ProgramHandle {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            let _guard = compile_lock();
            drop(program);
            trace!("released program handle");
        }
    }
}

/// A compiled regular expression.
///
/// # Examples
///
/// ```
/// use rubex::Regex;
///
/// let re = Regex::new(r"(?<word>\w+)@(\w+)").unwrap();
/// assert!(re.is_match_str("mail bob@example"));
/// assert_eq!(re.find_str("mail bob@example"), Some("bob@example"));
/// assert_eq!(re.num_subexp(), 2);
/// assert_eq!(re.subexp_names(), &["", "word", ""]);
/// ```
pub struct Regex {
    pattern: String,
    options: Options,
    engine: Arc<dyn Engine>,
    handle: ProgramHandle,
    names: Arc<NameTable>,
    num_subexp: usize,
}

impl Regex {
    /// Compile `pattern` with default options.
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        Self::with_options(pattern, Options::DEFAULT)
    }

    /// Compile `pattern` with `options`.
    pub fn with_options(pattern: &str, options: Options) -> Result<Regex, RegexError> {
        Self::compile(default_engine(), pattern, options)
    }

    /// Compile `pattern` with ASCII-only character types and case folding.
    pub fn new_ascii(pattern: &str) -> Result<Regex, RegexError> {
        Self::with_options(pattern, Options::ASCII_RANGE)
    }

    /// Create a [`RegexBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    fn compile(engine: Arc<dyn Engine>, pattern: &str, options: Options) -> Result<Regex, RegexError> {
        let program = Self::compile_program(engine.as_ref(), pattern, options)?;
        let num_subexp = program.captures_len();
        let names = Arc::new(NameTable::build(num_subexp, program.names()));
        debug!(pattern, ?options, num_subexp, "compiled pattern");
        Ok(Regex {
            pattern: pattern.to_owned(),
            options,
            engine,
            handle: ProgramHandle {
                program: Some(program),
            },
            names,
            num_subexp,
        })
    }

    fn compile_program(
        engine: &dyn Engine,
        pattern: &str,
        options: Options,
    ) -> Result<Box<dyn Program>, RegexError> {
        let _guard = compile_lock();
        engine.compile(pattern, options)
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Options the current program was compiled with.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Number of capturing groups, not counting group 0.
    pub fn num_subexp(&self) -> usize {
        self.num_subexp
    }

    /// Group names indexed by group number. Entry 0 and unnamed groups are
    /// `""`.
    pub fn subexp_names(&self) -> &[String] {
        self.names.subexp_names()
    }

    /// Lowest group index carrying `name`.
    pub fn subexp_index(&self, name: &str) -> Option<usize> {
        self.names.indices(name).first().copied()
    }

    /// True if the pattern contains anything [`quote_meta`] would escape.
    pub fn has_metacharacters(&self) -> bool {
        quote_meta(&self.pattern) != self.pattern
    }

    /// An independent regex with its own program, made by recompiling.
    pub fn copy(&self) -> Result<Regex, RegexError> {
        debug!(pattern = %self.pattern, "copying pattern");
        Self::compile(Arc::clone(&self.engine), &self.pattern, self.options)
    }

    /// Switches to leftmost-longest matching.
    ///
    /// The program is recompiled with [`Options::FIND_LONGEST`]. On error the
    /// regex is left unchanged.
    ///
    /// ```
    /// use rubex::Regex;
    ///
    /// let mut re = Regex::new("a(|b)").unwrap();
    /// assert_eq!(re.find_str("ab"), Some("a"));
    /// re.longest().unwrap();
    /// assert_eq!(re.find_str("ab"), Some("ab"));
    /// ```
    pub fn longest(&mut self) -> Result<(), RegexError> {
        let options = self.options | Options::FIND_LONGEST;
        let program = Self::compile_program(self.engine.as_ref(), &self.pattern, options)?;
        debug!(pattern = %self.pattern, "recompiled for leftmost-longest");
        let num_subexp = program.captures_len();
        self.names = Arc::new(NameTable::build(num_subexp, program.names()));
        self.num_subexp = num_subexp;
        self.options = options;
        // the old handle is released here, after the compile lock is dropped
        self.handle = ProgramHandle {
            program: Some(program),
        };
        Ok(())
    }

    /// Releases the program now. Equivalent to dropping the regex.
    pub fn free(self) {
        drop(self);
    }

    pub(crate) fn names(&self) -> &Arc<NameTable> {
        &self.names
    }

    pub(crate) fn search(&self, text: &[u8], start: usize) -> Option<Region> {
        if start > text.len() {
            return None;
        }
        self.handle.get()?.search(text, start)
    }

    pub(crate) fn search_is_match(&self, text: &[u8], start: usize) -> bool {
        start <= text.len() && self.handle.get().is_some_and(|prog| prog.is_match(text, start))
    }
}

/// Compiles `pattern` and reports whether it matches anywhere in `text`.
///
/// ```
/// assert!(rubex::is_match(r"^\d+$", "12345").unwrap());
/// assert!(rubex::is_match("(", "x").is_err());
/// ```
pub fn is_match(pattern: &str, text: &str) -> Result<bool, RegexError> {
    Ok(Regex::new(pattern)?.is_match_str(text))
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regex")
            .field("pattern", &self.pattern)
            .field("options", &self.options)
            .field("num_subexp", &self.num_subexp)
            .finish_non_exhaustive()
    }
}

impl FromStr for Regex {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Regex, RegexError> {
        Regex::new(s)
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with custom options or another engine.
///
/// # Examples
///
/// ```
/// use rubex::Regex;
///
/// let re = Regex::builder(r"^hello$")
///     .case_insensitive(true)
///     .multi_line(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match_str("bye\nHello\n"));
/// ```
pub struct RegexBuilder {
    pattern: String,
    options: Options,
    engine: Option<Arc<dyn Engine>>,
}

impl RegexBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        RegexBuilder {
            pattern: pattern.to_owned(),
            options: Options::DEFAULT,
            engine: None,
        }
    }

    fn flag(mut self, flag: Options, yes: bool) -> Self {
        self.options.set(flag, yes);
        self
    }

    /// Enable or disable case-insensitive matching.
    pub fn case_insensitive(self, yes: bool) -> Self {
        self.flag(Options::IGNORECASE, yes)
    }

    /// Enable or disable `^`/`$` matching at every line boundary.
    pub fn multi_line(self, yes: bool) -> Self {
        self.flag(Options::MULTILINE, yes)
    }

    /// Enable or disable leftmost-longest matching.
    pub fn longest(self, yes: bool) -> Self {
        self.flag(Options::FIND_LONGEST, yes)
    }

    /// Restrict character types and case folding to ASCII.
    pub fn ascii(self, yes: bool) -> Self {
        self.flag(Options::ASCII_RANGE, yes)
    }

    /// Replace the whole option set.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Compile with `engine` instead of the built-in backtracker.
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Compile the pattern into a [`Regex`].
    pub fn build(self) -> Result<Regex, RegexError> {
        let engine = self.engine.unwrap_or_else(default_engine);
        Regex::compile(engine, &self.pattern, self.options)
    }
}
