// template.rs - `$`-substitution templates.
//
// A template is parsed once into literal runs and group references, then
// evaluated against any number of matches. Parsing never fails: anything that
// is not a well-formed reference is kept as literal text.

use memchr::memchr;

use crate::captures::CaptureLookup;
use crate::encodings::utf8::decode;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(Vec<u8>),
    /// `$N` or `${N}`.
    Group(usize),
    /// `$name` or `${name}`.
    Name(String),
}

/// A parsed replacement template.
///
/// | Syntax     | Meaning                                        |
/// |------------|------------------------------------------------|
/// | `$$`       | a literal `$`                                  |
/// | `$0`..`$9` | group by number, one digit                     |
/// | `${N}`     | group by number, any width                     |
/// | `$name`    | group by name (letters, digits, `_`)           |
/// | `${name}`  | group by name                                  |
///
/// Unset groups, unknown names and out-of-range numbers expand to nothing.
///
/// ```
/// use rubex::{Regex, Template};
///
/// let re = Regex::new(r"(?<first>\w+)\s(?<last>\w+)").unwrap();
/// let caps = re.captures(b"Ada Lovelace").unwrap();
/// let t = Template::parse(b"${last}, $first ($$1 = $1)");
/// assert_eq!(t.evaluate(&caps), b"Lovelace, Ada ($1 = Ada)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &[u8]) -> Template {
        let mut b = Builder::default();
        let mut i = 0;
        while let Some(off) = memchr(b'$', &template[i..]) {
            b.literal(&template[i..i + off]);
            i += off;
            let rest = &template[i + 1..];
            match rest.first() {
                None => {
                    b.literal(b"$");
                    i += 1;
                }
                Some(b'$') => {
                    b.literal(b"$");
                    i += 2;
                }
                Some(d) if d.is_ascii_digit() => {
                    b.push(Segment::Group((d - b'0') as usize));
                    i += 2;
                }
                Some(b'{') => match memchr(b'}', &rest[1..]) {
                    Some(close) => {
                        b.push(braced(&rest[1..1 + close]));
                        i += close + 3;
                    }
                    None => {
                        b.literal(&template[i..]);
                        i = template.len();
                    }
                },
                Some(_) => match bare_name(rest) {
                    Some(len) => {
                        b.push(Segment::Name(String::from_utf8_lossy(&rest[..len]).into_owned()));
                        i += 1 + len;
                    }
                    None => {
                        b.literal(b"$");
                        i += 1;
                    }
                },
            }
        }
        b.literal(&template[i..]);
        b.finish()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the template contains no references.
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Appends the expansion for `caps` to `dst`.
    pub fn expand<C: CaptureLookup + ?Sized>(&self, caps: &C, dst: &mut Vec<u8>) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(bytes) => dst.extend_from_slice(bytes),
                Segment::Group(i) => {
                    if let Some(g) = caps.group(*i) {
                        dst.extend_from_slice(g);
                    }
                }
                Segment::Name(name) => {
                    if let Some(g) = caps.named(name) {
                        dst.extend_from_slice(g);
                    }
                }
            }
        }
    }

    pub fn evaluate<C: CaptureLookup + ?Sized>(&self, caps: &C) -> Vec<u8> {
        let mut out = Vec::new();
        self.expand(caps, &mut out);
        out
    }
}

impl From<&[u8]> for Template {
    fn from(t: &[u8]) -> Template {
        Template::parse(t)
    }
}

impl From<&str> for Template {
    fn from(t: &str) -> Template {
        Template::parse(t.as_bytes())
    }
}

// All-digit braces are numbers; anything else is a name.
fn braced(inner: &[u8]) -> Segment {
    if !inner.is_empty() && inner.iter().all(u8::is_ascii_digit) {
        // an index too large for usize can never name a group
        let index = std::str::from_utf8(inner)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(usize::MAX);
        Segment::Group(index)
    } else {
        Segment::Name(String::from_utf8_lossy(inner).into_owned())
    }
}

// Byte length of the name at the start of `rest`, if one starts there.
fn bare_name(rest: &[u8]) -> Option<usize> {
    let (first, mut len) = decode(rest, 0)?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    while let Some((ch, w)) = decode(rest, len) {
        if !(ch.is_alphanumeric() || ch == '_') {
            break;
        }
        len += w;
    }
    Some(len)
}

#[derive(Default)]
struct Builder {
    segments: Vec<Segment>,
    pending: Vec<u8>,
}

impl Builder {
    fn literal(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn push(&mut self, segment: Segment) {
        self.flush();
        self.segments.push(segment);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.segments.push(Segment::Literal(std::mem::take(&mut self.pending)));
        }
    }

    fn finish(mut self) -> Template {
        self.flush();
        Template {
            segments: self.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.as_bytes().to_vec())
    }

    fn name(s: &str) -> Segment {
        Segment::Name(s.to_string())
    }

    fn eval(t: &str, groups: &[Option<&[u8]>]) -> String {
        String::from_utf8(Template::from(t).evaluate(groups)).unwrap()
    }

    #[test]
    fn parse_forms() {
        assert_eq!(
            Template::from("a$1b${22}c$name.${x y}").segments(),
            &[
                lit("a"),
                Segment::Group(1),
                lit("b"),
                Segment::Group(22),
                lit("c"),
                name("name"),
                lit("."),
                name("x y"),
            ]
        );
    }

    #[test]
    fn single_digit_then_text() {
        assert_eq!(Template::from("$12").segments(), &[Segment::Group(1), lit("2")]);
        assert_eq!(Template::from("$1a").segments(), &[Segment::Group(1), lit("a")]);
    }

    #[test]
    fn dollar_edge_cases() {
        assert_eq!(Template::from("$$").segments(), &[lit("$")]);
        assert_eq!(Template::from("cost: $").segments(), &[lit("cost: $")]);
        assert_eq!(Template::from("$-x").segments(), &[lit("$-x")]);
        assert_eq!(Template::from("a${b").segments(), &[lit("a${b")]);
        assert!(Template::from("plain").is_literal());
        assert!(!Template::from("$x").is_literal());
    }

    #[test]
    fn unicode_names() {
        assert_eq!(Template::from("$名前!").segments(), &[name("名前"), lit("!")]);
        assert_eq!(Template::from("$_x1 ").segments(), &[name("_x1"), lit(" ")]);
    }

    #[test]
    fn evaluation_soft_failures() {
        let groups: [Option<&[u8]>; 3] = [Some(&b"whole"[..]), Some(&b"one"[..]), None];
        assert_eq!(eval("<$0|$1|$2|$7|${99}|$nope>", &groups), "<whole|one|||||>");
        assert_eq!(eval("${99999999999999999999999}", &groups), "");
    }
}
