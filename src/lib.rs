//! # Rubex
//!
//! Go-style regular expression API over an Oniguruma-flavoured matcher:
//! leftmost search, submatch extraction, find-all iteration, `$`-templates,
//! replace-all and split, for both byte slices and `&str`.
//!
//! Matching is delegated to an [`Engine`](engine::Engine). The crate ships a
//! backtracking engine ([`engine::backtrack::Backtrack`]) that is used unless a
//! [`RegexBuilder`] is given another one.
//!
//! ## Quick Start
//!
//! ```rust
//! use rubex::prelude::*;
//!
//! let re = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
//! assert_eq!(re.find_str("Date: 2026-02-12"), Some("2026-02-12"));
//! assert_eq!(re.find_str_index("Date: 2026-02-12"), Some(6..16));
//! ```
//!
//! Named groups and templates:
//!
//! ```rust
//! use rubex::prelude::*;
//!
//! let re = Regex::new(r"(?<key>\w+)=(?<value>\w+)").unwrap();
//! let out = re.replace_all_str("a=1 b=2", "${value}:$key");
//! assert_eq!(out, "1:a 2:b");
//! ```
//!
//! For fine-grained control, use [`RegexBuilder`]:
//!
//! ```rust
//! use rubex::prelude::*;
//!
//! let re = Regex::builder(r"hello")
//!     .case_insensitive(true)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match_str("Hello World"));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regex`] | `Regex` handle, builder, compile lock |
//! | [`find`] | Match cursor and the find family |
//! | [`captures`] | `Match`, `Captures`, name lookup |
//! | [`template`] | `$`-template parsing and expansion |
//! | [`replace`] | Replace-all driver, `expand` |
//! | [`split`] | Splitting around matches |
//! | [`reader`] | Searching `io::Read` sources |
//! | [`quote`] | Escaping literal text |
//! | [`engine`] | Matcher traits and the backtracking engine |

pub mod captures;
pub mod encodings;
pub mod engine;
pub mod error;
pub mod find;
pub mod names;
pub mod options;
pub mod prelude;
pub mod quote;
pub mod reader;
pub mod regex;
pub mod region;
pub mod replace;
pub mod split;
pub mod template;

pub use crate::captures::{CaptureLookup, Captures, Match, SubCaptures};
pub use crate::error::RegexError;
pub use crate::find::{CaptureMatches, FindIter, Matches};
pub use crate::names::NameTable;
pub use crate::options::Options;
pub use crate::quote::{quote_meta, quote_meta_bytes};
pub use crate::regex::{is_match, Regex, RegexBuilder};
pub use crate::region::{Region, REGION_NOTPOS};
pub use crate::template::{Segment, Template};
