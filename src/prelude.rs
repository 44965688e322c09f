// prelude.rs - Convenient re-exports for everyday use.
//
//! # Prelude
//!
//! ```
//! use rubex::prelude::*;
//!
//! let re = Regex::new(r"\d+").unwrap();
//! let m = re.find_iter(b"answer: 42").next().unwrap();
//! assert_eq!(m.as_str(), "42");
//! ```

pub use crate::captures::{Captures, Match};
pub use crate::error::RegexError;
pub use crate::find::{CaptureMatches, FindIter};
pub use crate::options::Options;
pub use crate::quote::quote_meta;
pub use crate::regex::{Regex, RegexBuilder};
pub use crate::region::Region;
pub use crate::template::Template;
