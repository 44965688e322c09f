// api_test.rs - Integration tests for the Regex handle and builder.

use rubex::prelude::*;
use rubex::{is_match, quote_meta};

// === Regex::new ===

#[test]
fn simple_pattern() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(re.find_str("abc 123 def"), Some("123"));
}

#[test]
fn unicode_pattern() {
    let re = Regex::new(r"\p{Hiragana}+").unwrap();
    assert_eq!(re.find_str("hello せかい world"), Some("せかい"));
}

#[test]
fn no_match_returns_none() {
    let re = Regex::new(r"xyz").unwrap();
    assert!(re.find_str("abc").is_none());
    assert!(re.find_str_index("abc").is_none());
}

#[test]
fn empty_pattern() {
    let re = Regex::new(r"").unwrap();
    assert_eq!(re.find_str_index("hello"), Some(0..0));
    assert_eq!(re.find_str("hello"), Some(""));
}

#[test]
fn invalid_pattern_syntax_error() {
    let err = Regex::new(r"(unclosed").unwrap_err();
    match &err {
        RegexError::Syntax { pattern, message } => {
            assert_eq!(pattern, "(unclosed");
            assert_eq!(message, "end pattern with unmatched parenthesis");
        }
    }
}

#[test]
fn invalid_pattern_messages() {
    let message = |p: &str| Regex::new(p).unwrap_err().to_string();
    assert_eq!(message("[]"), "premature end of char-class");
    assert_eq!(message("a)"), "unmatched close parenthesis");
    assert_eq!(message("*a"), "target of repeat operator is not specified");
    assert_eq!(message("a{3,2}"), "upper is smaller than lower in repeat range");
    assert_eq!(message("[z-a]"), "empty range in char class");
    assert_eq!(message(r"\"), "end pattern at escape");
    assert_eq!(message(r"\k<nope>"), "undefined name <nope> reference");
}

#[test]
fn from_str_and_display() {
    let re: Regex = r"a+b".parse().unwrap();
    assert_eq!(re.to_string(), "a+b");
    assert_eq!(re.as_str(), "a+b");
    assert!("(".parse::<Regex>().is_err());
    let debug = format!("{:?}", re);
    assert!(debug.contains("a+b"), "{}", debug);
}

#[test]
fn top_level_is_match() {
    assert!(is_match(r"^\w+$", "hello").unwrap());
    assert!(!is_match(r"^\w+$", "hello world").unwrap());
    let err = is_match("a**(", "x").unwrap_err();
    assert!(!err.message().is_empty());
}

// === Group metadata ===

#[test]
fn subexp_names_and_count() {
    let re = Regex::new(r"(?<year>\d{4})-(\d{2})-(?P<day>\d{2})").unwrap();
    assert_eq!(re.num_subexp(), 3);
    assert_eq!(re.subexp_names(), &["", "year", "", "day"]);
    assert_eq!(re.subexp_index("day"), Some(3));
    assert_eq!(re.subexp_index("month"), None);
}

#[test]
fn duplicate_names() {
    let re = Regex::new(r"(?<x>a)|(?<x>b)").unwrap();
    assert_eq!(re.subexp_names(), &["", "x", "x"]);
    assert_eq!(re.subexp_index("x"), Some(1));
    let caps = re.captures(b"b").unwrap();
    assert_eq!(caps.name("x").unwrap().range(), 0..1);
}

#[test]
fn plain_groups_capture_next_to_named() {
    let re = Regex::new(r"(a)(?<n>b)(c)").unwrap();
    assert_eq!(re.num_subexp(), 3);
    assert_eq!(re.find_str_submatch("abc").unwrap(), vec![Some("abc"), Some("a"), Some("b"), Some("c")]);
}

#[test]
fn has_metacharacters() {
    assert!(!Regex::new("plain_word").unwrap().has_metacharacters());
    assert!(Regex::new("a.b").unwrap().has_metacharacters());
    assert!(!Regex::new(&quote_meta("a.b")).unwrap().is_match_str("axb"));
}

// === Lifecycle ===

#[test]
fn copy_is_independent() {
    let re = Regex::new(r"(\w)+").unwrap();
    let dup = re.copy().unwrap();
    re.free();
    assert_eq!(dup.find_str("héllo!"), Some("héllo"));
    assert_eq!(dup.num_subexp(), 1);
}

#[test]
fn longest_switch() {
    let mut re = Regex::new("a|ab|abc").unwrap();
    assert_eq!(re.find_str("abcd"), Some("a"));
    re.longest().unwrap();
    assert!(re.options().contains(Options::FIND_LONGEST));
    assert_eq!(re.find_str("abcd"), Some("abc"));
    assert_eq!(re.as_str(), "a|ab|abc");
}

// === RegexBuilder ===

#[test]
fn builder_case_insensitive() {
    let re = Regex::builder("hello").case_insensitive(true).build().unwrap();
    assert!(re.is_match_str("HELLO"));
    assert!(re.options().contains(Options::IGNORECASE));
}

#[test]
fn builder_multi_line() {
    let re = RegexBuilder::new("^b$").build().unwrap();
    assert!(!re.is_match_str("a\nb\nc"));
    let re = RegexBuilder::new("^b$").multi_line(true).build().unwrap();
    assert_eq!(re.find_str_index("a\nb\nc"), Some(2..3));
}

#[test]
fn builder_ascii() {
    let re = Regex::builder(r"\w+").ascii(true).build().unwrap();
    assert_eq!(re.find_str("日本go"), Some("go"));
    let re = Regex::new_ascii(r"\d").unwrap();
    assert!(!re.is_match_str("٣"));
}

#[test]
fn builder_longest_and_options() {
    let re = Regex::builder("x|xy").longest(true).build().unwrap();
    assert_eq!(re.find_str("xy"), Some("xy"));
    let re = Regex::builder("X")
        .options(Options::IGNORECASE | Options::MULTILINE)
        .build()
        .unwrap();
    assert_eq!(re.options(), Options::IGNORECASE | Options::MULTILINE);
    assert!(re.is_match_str("x"));
}

#[test]
fn builder_flag_toggle() {
    let re = Regex::builder("a")
        .case_insensitive(true)
        .case_insensitive(false)
        .build()
        .unwrap();
    assert!(!re.is_match_str("A"));
}

// === Captures ===

#[test]
fn captures_basic() {
    let re = Regex::new(r"(\w+)@(\w+)\.com").unwrap();
    let caps = re.captures(b"user@example.com").unwrap();
    assert_eq!(caps.len(), 3);
    assert_eq!(caps.get(0).unwrap().as_str(), "user@example.com");
    assert_eq!(caps.get(1).unwrap().as_str(), "user");
    assert_eq!(caps.get(2).unwrap().as_str(), "example");
    assert!(caps.get(3).is_none());
}

#[test]
fn captures_optional_group_unset() {
    let re = Regex::new(r"(a)(b)?").unwrap();
    let caps = re.captures(b"a").unwrap();
    assert!(caps.get(1).is_some());
    assert!(caps.get(2).is_none());
    assert_eq!(caps.region().to_offsets(), vec![0, 1, 0, 1, -1, -1]);
}

#[test]
fn captures_iter_groups() {
    let re = Regex::new(r"(\d)(\w)?").unwrap();
    let caps = re.captures(b"1").unwrap();
    let groups: Vec<Option<&[u8]>> = caps.iter().map(|m| m.map(|m| m.as_bytes())).collect();
    assert_eq!(groups, vec![Some(&b"1"[..]), Some(&b"1"[..]), None]);
    assert_eq!(caps.to_slices(), groups);
}

#[test]
fn captures_iter_all() {
    let re = Regex::new(r"(?<k>\w)=(?<v>\d)").unwrap();
    let pairs: Vec<(String, String)> = re
        .captures_iter(b"a=1, b=2, c=x")
        .map(|c| {
            let k = c.name("k").unwrap().as_str().into_owned();
            let v = c.name("v").unwrap().as_str().into_owned();
            (k, v)
        })
        .collect();
    assert_eq!(pairs, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
}
