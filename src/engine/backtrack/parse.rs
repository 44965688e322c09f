// engine/backtrack/parse.rs - Pattern text to syntax tree.
//
// Recursive descent over the pattern's characters. Flags set with `(?imsx)`
// stay in effect until the enclosing group closes.

use smallvec::SmallVec;

use super::messages::*;
use crate::error::RegexError;
use crate::options::Options;

/// Largest count accepted in `{n,m}`.
pub const MAX_REPEAT: u32 = 100_000;

/// Nesting limit for groups and classes.
///
/// Parsing, compiling and matching recurse once per level. This many levels
/// fit a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_PARSE_DEPTH_LIMIT: u32 = 100;

// Height limit for the syntax tree. Each source nesting level adds at most
// three tree levels; stacked quantifiers spend the rest.
const TREE_HEIGHT_LIMIT: usize = 4 * DEFAULT_PARSE_DEPTH_LIMIT as usize;

/// Character categories used by escapes, POSIX brackets and `\p{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Digit,
    Word,
    Space,
    Hex,
    Alpha,
    Alnum,
    Upper,
    Lower,
    Punct,
    Cntrl,
    Graph,
    Print,
    Blank,
    Ascii,
    Letter,
    Number,
    Han,
    Hiragana,
    Katakana,
}

impl CharType {
    /// Tests `ch`. With `ascii` set, only ASCII characters can match.
    pub fn matches(self, ch: char, ascii: bool) -> bool {
        if ascii && !ch.is_ascii() {
            return false;
        }
        match self {
            CharType::Digit => {
                if ch.is_ascii() {
                    ch.is_ascii_digit()
                } else {
                    ch.is_numeric()
                }
            }
            CharType::Word => ch.is_alphanumeric() || ch == '_',
            CharType::Space => ch.is_whitespace(),
            CharType::Hex => ch.is_ascii_hexdigit(),
            CharType::Alpha | CharType::Letter => ch.is_alphabetic(),
            CharType::Alnum => ch.is_alphanumeric(),
            CharType::Upper => ch.is_uppercase(),
            CharType::Lower => ch.is_lowercase(),
            CharType::Punct => is_punct(ch),
            CharType::Cntrl => ch.is_control(),
            CharType::Graph => !ch.is_whitespace() && !ch.is_control(),
            CharType::Print => !ch.is_control(),
            CharType::Blank => ch == ' ' || ch == '\t' || (!ch.is_ascii() && is_space_separator(ch)),
            CharType::Ascii => ch.is_ascii(),
            CharType::Number => ch.is_numeric(),
            CharType::Han => matches!(ch,
                '\u{2E80}'..='\u{2FDF}'
                | '\u{3005}' | '\u{3007}' | '\u{3021}'..='\u{3029}'
                | '\u{3400}'..='\u{4DBF}'
                | '\u{4E00}'..='\u{9FFF}'
                | '\u{F900}'..='\u{FAFF}'
                | '\u{20000}'..='\u{3134F}'),
            CharType::Hiragana => matches!(ch, '\u{3041}'..='\u{309F}' | '\u{1B001}'..='\u{1B11F}'),
            CharType::Katakana => matches!(ch,
                '\u{30A1}'..='\u{30FF}'
                | '\u{31F0}'..='\u{31FF}'
                | '\u{32D0}'..='\u{32FE}'
                | '\u{3300}'..='\u{3357}'
                | '\u{FF66}'..='\u{FF6F}'
                | '\u{FF71}'..='\u{FF9D}'),
        }
    }

    fn from_posix(name: &str) -> Option<CharType> {
        Some(match name {
            "alnum" => CharType::Alnum,
            "alpha" => CharType::Alpha,
            "ascii" => CharType::Ascii,
            "blank" => CharType::Blank,
            "cntrl" => CharType::Cntrl,
            "digit" => CharType::Digit,
            "graph" => CharType::Graph,
            "lower" => CharType::Lower,
            "print" => CharType::Print,
            "punct" => CharType::Punct,
            "space" => CharType::Space,
            "upper" => CharType::Upper,
            "xdigit" => CharType::Hex,
            "word" => CharType::Word,
            _ => return None,
        })
    }

    // Property names compare case-insensitively, ignoring ' ', '-' and '_'.
    fn from_property(name: &str) -> Option<CharType> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Some(match key.as_str() {
            "l" | "letter" => CharType::Letter,
            "lu" | "uppercaseletter" => CharType::Upper,
            "ll" | "lowercaseletter" => CharType::Lower,
            "n" | "number" => CharType::Number,
            "nd" | "decimalnumber" => CharType::Digit,
            "p" | "punctuation" => CharType::Punct,
            "alpha" => CharType::Alpha,
            "alnum" => CharType::Alnum,
            "digit" => CharType::Digit,
            "space" => CharType::Space,
            "upper" => CharType::Upper,
            "lower" => CharType::Lower,
            "word" => CharType::Word,
            "punct" => CharType::Punct,
            "ascii" => CharType::Ascii,
            "han" => CharType::Han,
            "hiragana" => CharType::Hiragana,
            "katakana" => CharType::Katakana,
            _ => return None,
        })
    }
}

fn is_punct(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation();
    }
    matches!(ch,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
        | '\u{2010}'..='\u{2027}'
        | '\u{2030}'..='\u{205E}'
        | '\u{3001}'..='\u{3003}'
        | '\u{3008}'..='\u{3011}'
        | '\u{3014}'..='\u{301F}'
        | '\u{FF01}'..='\u{FF0F}'
        | '\u{FF1A}'..='\u{FF20}'
        | '\u{FF3B}'..='\u{FF3D}'
        | '\u{FF5B}'..='\u{FF65}')
}

fn is_space_separator(ch: char) -> bool {
    matches!(
        ch,
        '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Simple case fold: the single-character lowercase mapping, if any.
pub fn fold(ch: char, ascii: bool) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    if ascii {
        return ch;
    }
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => ch,
    }
}

/// `ch` plus its single-character lower and upper case forms.
pub fn case_variants(ch: char, ascii: bool) -> SmallVec<[char; 3]> {
    let mut out: SmallVec<[char; 3]> = SmallVec::new();
    out.push(ch);
    if ascii && !ch.is_ascii() {
        return out;
    }
    let mut lower = ch.to_lowercase();
    if let (Some(l), None) = (lower.next(), lower.next()) {
        if !out.contains(&l) {
            out.push(l);
        }
    }
    let mut upper = ch.to_uppercase();
    if let (Some(u), None) = (upper.next(), upper.next()) {
        if !out.contains(&u) {
            out.push(u);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Range(char, char),
    Type { ty: CharType, negate: bool, ascii: bool },
    Nested(Class),
}

/// A bracket expression or a class escape such as `\w`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Class {
    pub negate: bool,
    pub items: Vec<ClassItem>,
}

impl Class {
    fn of_type(ty: CharType, negate: bool, ascii: bool) -> Class {
        Class {
            negate: false,
            items: vec![ClassItem::Type { ty, negate, ascii }],
        }
    }

    fn contains(&self, ch: char) -> bool {
        self.items.iter().any(|item| match item {
            ClassItem::Range(lo, hi) => *lo <= ch && ch <= *hi,
            ClassItem::Type { ty, negate, ascii } => ty.matches(ch, *ascii) != *negate,
            ClassItem::Nested(class) => class.matches(ch, false, false),
        })
    }

    /// Membership test. Under `icase` every case variant of `ch` is tried
    /// before negation is applied.
    pub fn matches(&self, ch: char, icase: bool, ascii: bool) -> bool {
        let hit = if icase {
            case_variants(ch, ascii).into_iter().any(|v| self.contains(v))
        } else {
            self.contains(ch)
        };
        hit != self.negate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    LineStart,
    LineEnd,
    TextStart,
    TextEnd,
    TextEndNewline,
    WordBoundary,
    NotWordBoundary,
    SearchStart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Empty,
    Literal { ch: char, icase: bool },
    Any { dotall: bool },
    Class { class: Box<Class>, icase: bool },
    Assert(Assertion),
    Group { index: usize, node: Box<Node> },
    Concat(Vec<Node>),
    Alternate(Vec<Node>),
    Repeat {
        node: Box<Node>,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        possessive: bool,
    },
    BackRef { groups: Vec<usize>, icase: bool },
    NamedBackRef { name: String, icase: bool },
    Look { negate: bool, node: Box<Node> },
    Atomic(Box<Node>),
}

/// Parse result.
#[derive(Debug)]
pub struct Ast {
    pub node: Node,
    pub num_groups: usize,
    pub names: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    icase: bool,
    multiline: bool,
    dotall: bool,
    extended: bool,
}

struct Parser<'p> {
    pattern: &'p str,
    chars: Vec<char>,
    pos: usize,
    flags: Flags,
    ascii: bool,
    depth: u32,
    num_groups: usize,
    names: Vec<(String, usize)>,
}

enum ClassAtom {
    Char(char),
    Item(ClassItem),
}

pub fn parse(pattern: &str, options: Options) -> Result<Ast, RegexError> {
    let mut p = Parser {
        pattern,
        chars: pattern.chars().collect(),
        pos: 0,
        flags: Flags {
            icase: options.contains(Options::IGNORECASE),
            multiline: options.contains(Options::MULTILINE),
            ..Flags::default()
        },
        ascii: options.contains(Options::ASCII_RANGE),
        depth: 0,
        num_groups: 0,
        names: Vec::new(),
    };
    let mut node = p.parse_alternation()?;
    if p.pos < p.chars.len() {
        // parse_alternation only stops early on ')'
        return Err(p.err(UNMATCHED_CLOSE_PARENTHESIS));
    }
    resolve(&mut node, p.num_groups, &p.names, pattern)?;
    Ok(Ast {
        node,
        num_groups: p.num_groups,
        names: p.names,
    })
}

impl<'p> Parser<'p> {
    fn err(&self, message: impl Into<String>) -> RegexError {
        RegexError::syntax(self.pattern, message)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), RegexError> {
        self.depth += 1;
        if self.depth > DEFAULT_PARSE_DEPTH_LIMIT {
            return Err(self.err(PARSE_DEPTH_LIMIT_OVER));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn skip_extended(&mut self) {
        if !self.flags.extended {
            return;
        }
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn parse_alternation(&mut self) -> Result<Node, RegexError> {
        let mut branches = vec![self.parse_concat()?];
        while self.eat('|') {
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap_or(Node::Empty)
        } else {
            Node::Alternate(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Node, RegexError> {
        let mut items: Vec<Node> = Vec::new();
        // false at the start of a branch and right after a flag group
        let mut can_repeat = false;
        loop {
            self.skip_extended();
            let Some(c) = self.peek() else { break };
            if c == '|' || c == ')' {
                break;
            }
            let save = self.pos;
            if let Some((min, max)) = self.parse_quantifier()? {
                let greedy;
                let possessive;
                if self.eat('?') {
                    greedy = false;
                    possessive = false;
                } else if self.eat('+') {
                    greedy = true;
                    possessive = true;
                } else {
                    greedy = true;
                    possessive = false;
                }
                let target = match items.pop() {
                    Some(node) if can_repeat => node,
                    _ => {
                        self.pos = save;
                        return Err(self.err(TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED));
                    }
                };
                if matches!(target, Node::Assert(_)) {
                    return Err(self.err(TARGET_OF_REPEAT_OPERATOR_INVALID));
                }
                if height(&target) + 3 * self.depth as usize >= TREE_HEIGHT_LIMIT {
                    return Err(self.err(PARSE_DEPTH_LIMIT_OVER));
                }
                items.push(Node::Repeat {
                    node: Box::new(target),
                    min,
                    max,
                    greedy,
                    possessive,
                });
                continue;
            }
            match self.parse_atom()? {
                Some(node) => {
                    items.push(node);
                    can_repeat = true;
                }
                None => can_repeat = false,
            }
        }
        Ok(match items.len() {
            0 => Node::Empty,
            1 => items.pop().unwrap_or(Node::Empty),
            _ => Node::Concat(items),
        })
    }

    /// Consumes a quantifier if one starts here. An interval that does not
    /// parse leaves `{` to be read as a literal.
    fn parse_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, RegexError> {
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                Ok(Some((0, None)))
            }
            Some('+') => {
                self.pos += 1;
                Ok(Some((1, None)))
            }
            Some('?') => {
                self.pos += 1;
                Ok(Some((0, Some(1))))
            }
            Some('{') => self.parse_interval(),
            _ => Ok(None),
        }
    }

    fn parse_interval(&mut self) -> Result<Option<(u32, Option<u32>)>, RegexError> {
        let start = self.pos;
        self.pos += 1;
        let lower = self.scan_number()?;
        let range = if self.eat(',') {
            let upper = self.scan_number()?;
            if lower.is_none() && upper.is_none() {
                None
            } else {
                Some((lower.unwrap_or(0), upper))
            }
        } else {
            lower.map(|n| (n, Some(n)))
        };
        match range {
            Some((min, max)) if self.eat('}') => {
                if let Some(max) = max {
                    if max < min {
                        return Err(self.err(UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE));
                    }
                }
                Ok(Some((min, max)))
            }
            _ => {
                self.pos = start;
                Ok(None)
            }
        }
    }

    fn scan_number(&mut self) -> Result<Option<u32>, RegexError> {
        let mut value: Option<u32> = None;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            self.pos += 1;
            let next = value.unwrap_or(0).saturating_mul(10).saturating_add(d);
            if next > MAX_REPEAT {
                return Err(self.err(TOO_BIG_NUMBER_FOR_REPEAT_RANGE));
            }
            value = Some(next);
        }
        Ok(value)
    }

    fn parse_atom(&mut self) -> Result<Option<Node>, RegexError> {
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let node = match c {
            '(' => return self.parse_group(),
            '[' => {
                let class = self.parse_class()?;
                Node::Class {
                    class: Box::new(class),
                    icase: self.flags.icase,
                }
            }
            '.' => Node::Any {
                dotall: self.flags.dotall,
            },
            '^' => Node::Assert(if self.flags.multiline {
                Assertion::LineStart
            } else {
                Assertion::TextStart
            }),
            '$' => Node::Assert(if self.flags.multiline {
                Assertion::LineEnd
            } else {
                Assertion::TextEnd
            }),
            '\\' => self.parse_escape()?,
            c => Node::Literal {
                ch: c,
                icase: self.flags.icase,
            },
        };
        Ok(Some(node))
    }

    fn parse_group(&mut self) -> Result<Option<Node>, RegexError> {
        if !self.eat('?') {
            self.num_groups += 1;
            let index = self.num_groups;
            let node = self.parse_group_body()?;
            return Ok(Some(Node::Group {
                index,
                node: Box::new(node),
            }));
        }
        let Some(c) = self.bump() else {
            return Err(self.err(END_PATTERN_IN_GROUP));
        };
        let node = match c {
            ':' => self.parse_group_body()?,
            '=' | '!' => Node::Look {
                negate: c == '!',
                node: Box::new(self.parse_group_body()?),
            },
            '>' => Node::Atomic(Box::new(self.parse_group_body()?)),
            '#' => {
                loop {
                    match self.bump() {
                        Some(')') => break,
                        Some(_) => {}
                        None => return Err(self.err(END_PATTERN_IN_GROUP)),
                    }
                }
                return Ok(None);
            }
            '<' => {
                if matches!(self.peek(), Some('=') | Some('!')) {
                    return Err(self.err(INVALID_LOOK_BEHIND_PATTERN));
                }
                self.parse_named_group('>')?
            }
            '\'' => self.parse_named_group('\'')?,
            'P' => {
                if !self.eat('<') {
                    return Err(self.err(UNDEFINED_GROUP_OPTION));
                }
                self.parse_named_group('>')?
            }
            'i' | 'm' | 's' | 'x' | '-' => {
                self.pos -= 1;
                return self.parse_flags();
            }
            _ => return Err(self.err(UNDEFINED_GROUP_OPTION)),
        };
        Ok(Some(node))
    }

    fn parse_group_body(&mut self) -> Result<Node, RegexError> {
        self.enter()?;
        let saved = self.flags;
        let node = self.parse_alternation()?;
        self.flags = saved;
        if !self.eat(')') {
            return Err(self.err(END_PATTERN_WITH_UNMATCHED_PARENTHESIS));
        }
        self.leave();
        Ok(node)
    }

    fn parse_named_group(&mut self, close: char) -> Result<Node, RegexError> {
        let name = self.scan_name(close)?;
        self.num_groups += 1;
        let index = self.num_groups;
        self.names.push((name, index));
        let node = self.parse_group_body()?;
        Ok(Node::Group {
            index,
            node: Box::new(node),
        })
    }

    fn scan_name(&mut self, close: char) -> Result<String, RegexError> {
        let mut name = String::new();
        loop {
            match self.bump() {
                Some(c) if c == close => break,
                Some(c) => name.push(c),
                None => return Err(self.err(invalid_group_name(&name))),
            }
        }
        if name.is_empty() {
            return Err(self.err(EMPTY_GROUP_NAME));
        }
        let mut chars = name.chars();
        let head_ok = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
        if !head_ok || !chars.all(|c| c.is_alphanumeric() || c == '_') {
            return Err(self.err(invalid_group_name(&name)));
        }
        Ok(name)
    }

    fn parse_flags(&mut self) -> Result<Option<Node>, RegexError> {
        let mut flags = self.flags;
        let mut on = true;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err(END_PATTERN_IN_GROUP));
            };
            match c {
                'i' => flags.icase = on,
                'm' => flags.multiline = on,
                's' => flags.dotall = on,
                'x' => flags.extended = on,
                '-' if on => on = false,
                ')' => {
                    self.flags = flags;
                    return Ok(None);
                }
                ':' => {
                    let saved = self.flags;
                    self.flags = flags;
                    let node = self.parse_group_body()?;
                    self.flags = saved;
                    return Ok(Some(node));
                }
                _ => return Err(self.err(UNDEFINED_GROUP_OPTION)),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<Node, RegexError> {
        let Some(c) = self.bump() else {
            return Err(self.err(END_PATTERN_AT_ESCAPE));
        };
        let icase = self.flags.icase;
        let node = match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                let (ty, negate) = self.escape_type(c);
                Node::Class {
                    class: Box::new(Class::of_type(ty, negate, self.ascii)),
                    icase: false,
                }
            }
            'p' | 'P' => {
                let item = self.parse_property(c == 'P')?;
                Node::Class {
                    class: Box::new(Class {
                        negate: false,
                        items: vec![item],
                    }),
                    icase: false,
                }
            }
            'A' => Node::Assert(Assertion::TextStart),
            'z' => Node::Assert(Assertion::TextEnd),
            'Z' => Node::Assert(Assertion::TextEndNewline),
            'b' => Node::Assert(Assertion::WordBoundary),
            'B' => Node::Assert(Assertion::NotWordBoundary),
            'G' => Node::Assert(Assertion::SearchStart),
            '1'..='9' => {
                let mut n = c.to_digit(10).unwrap_or(0) as usize;
                while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
                    self.pos += 1;
                    n = n.saturating_mul(10).saturating_add(d as usize);
                }
                Node::BackRef {
                    groups: vec![n],
                    icase,
                }
            }
            'k' if matches!(self.peek(), Some('<') | Some('\'')) => {
                let close = if self.bump() == Some('<') { '>' } else { '\'' };
                let mut name = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == close => break,
                        Some(c) => name.push(c),
                        None => return Err(self.err(INVALID_BACKREF)),
                    }
                }
                if name.is_empty() {
                    return Err(self.err(INVALID_BACKREF));
                }
                match name.parse::<usize>() {
                    Ok(n) => Node::BackRef {
                        groups: vec![n],
                        icase,
                    },
                    Err(_) => Node::NamedBackRef { name, icase },
                }
            }
            c => Node::Literal {
                ch: self.escaped_char(c)?,
                icase,
            },
        };
        Ok(node)
    }

    fn escape_type(&self, c: char) -> (CharType, bool) {
        match c {
            'd' => (CharType::Digit, false),
            'D' => (CharType::Digit, true),
            'w' => (CharType::Word, false),
            'W' => (CharType::Word, true),
            's' => (CharType::Space, false),
            'S' => (CharType::Space, true),
            'h' => (CharType::Hex, false),
            _ => (CharType::Hex, true),
        }
    }

    fn parse_property(&mut self, mut negate: bool) -> Result<ClassItem, RegexError> {
        if !self.eat('{') {
            return Err(self.err(invalid_char_property_name("")));
        }
        if self.eat('^') {
            negate = !negate;
        }
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => return Err(self.err(invalid_char_property_name(&name))),
            }
        }
        let ty = CharType::from_property(&name)
            .ok_or_else(|| self.err(invalid_char_property_name(&name)))?;
        Ok(ClassItem::Type {
            ty,
            negate,
            ascii: false,
        })
    }

    /// Single-character escapes shared by the top level and classes.
    fn escaped_char(&mut self, c: char) -> Result<char, RegexError> {
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'f' => '\x0C',
            'v' => '\x0B',
            'a' => '\x07',
            'e' => '\x1B',
            '0' => {
                let mut value = 0u32;
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            self.pos += 1;
                            value = value * 8 + d;
                        }
                        None => break,
                    }
                }
                char::from_u32(value).unwrap_or('\0')
            }
            'x' => {
                if self.eat('{') {
                    let mut digits = String::new();
                    loop {
                        match self.bump() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_hexdigit() => {
                                digits.push(c);
                                if digits.len() > 8 {
                                    return Err(self.err(TOO_LONG_WIDE_CHAR_VALUE));
                                }
                            }
                            _ => return Err(self.err(INVALID_CODE_POINT_VALUE)),
                        }
                    }
                    let value = u32::from_str_radix(&digits, 16)
                        .map_err(|_| self.err(INVALID_CODE_POINT_VALUE))?;
                    if value > 0x10FFFF {
                        return Err(self.err(TOO_BIG_WIDE_CHAR_VALUE));
                    }
                    char::from_u32(value).ok_or_else(|| self.err(INVALID_CODE_POINT_VALUE))?
                } else {
                    match self.scan_hex(2) {
                        Some(value) => char::from_u32(value).unwrap_or('\0'),
                        None => 'x',
                    }
                }
            }
            'u' => {
                if (0..4).all(|i| self.peek_at(i).is_some_and(|c| c.is_ascii_hexdigit())) {
                    let value = self.scan_hex(4).unwrap_or(0);
                    char::from_u32(value).ok_or_else(|| self.err(INVALID_CODE_POINT_VALUE))?
                } else {
                    'u'
                }
            }
            c => c,
        })
    }

    fn scan_hex(&mut self, max: usize) -> Option<u32> {
        let mut value: Option<u32> = None;
        for _ in 0..max {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    self.pos += 1;
                    value = Some(value.unwrap_or(0) * 16 + d);
                }
                None => break,
            }
        }
        value
    }

    fn parse_class(&mut self) -> Result<Class, RegexError> {
        self.enter()?;
        let mut class = Class {
            negate: self.eat('^'),
            items: Vec::new(),
        };
        let mut first = true;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err(PREMATURE_END_OF_CHAR_CLASS));
            };
            let atom = match c {
                ']' if !first => break,
                '[' => {
                    if self.peek() == Some(':') {
                        if let Some(item) = self.try_posix_bracket()? {
                            class.items.push(item);
                            first = false;
                            continue;
                        }
                    }
                    let nested = self.parse_class()?;
                    class.items.push(ClassItem::Nested(nested));
                    first = false;
                    continue;
                }
                '\\' => self.parse_class_escape()?,
                c => ClassAtom::Char(c),
            };
            first = false;
            match atom {
                ClassAtom::Item(item) => class.items.push(item),
                ClassAtom::Char(lo) => {
                    let is_range = self.peek() == Some('-')
                        && !matches!(self.peek_at(1), None | Some(']') | Some('['));
                    if !is_range {
                        class.items.push(ClassItem::Range(lo, lo));
                        continue;
                    }
                    self.pos += 1;
                    let hi = match self.bump() {
                        Some('\\') => self.parse_class_escape()?,
                        Some(c) => ClassAtom::Char(c),
                        None => return Err(self.err(PREMATURE_END_OF_CHAR_CLASS)),
                    };
                    match hi {
                        ClassAtom::Char(hi) => {
                            if hi < lo {
                                return Err(self.err(EMPTY_RANGE_IN_CHAR_CLASS));
                            }
                            class.items.push(ClassItem::Range(lo, hi));
                        }
                        ClassAtom::Item(item) => {
                            class.items.push(ClassItem::Range(lo, lo));
                            class.items.push(ClassItem::Range('-', '-'));
                            class.items.push(item);
                        }
                    }
                }
            }
        }
        self.leave();
        Ok(class)
    }

    /// Reads `[:name:]` or `[:^name:]` after the opening `[`. Returns `None`
    /// and consumes nothing when the text is not shaped like a bracket.
    fn try_posix_bracket(&mut self) -> Result<Option<ClassItem>, RegexError> {
        let start = self.pos;
        self.pos += 1;
        let negate = self.eat('^');
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
        if !(self.eat(':') && self.eat(']')) {
            self.pos = start;
            return Ok(None);
        }
        let ty = CharType::from_posix(&name).ok_or_else(|| self.err(INVALID_POSIX_BRACKET_TYPE))?;
        Ok(Some(ClassItem::Type {
            ty,
            negate,
            ascii: self.ascii,
        }))
    }

    fn parse_class_escape(&mut self) -> Result<ClassAtom, RegexError> {
        let Some(c) = self.bump() else {
            return Err(self.err(PREMATURE_END_OF_CHAR_CLASS));
        };
        Ok(match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                let (ty, negate) = self.escape_type(c);
                ClassAtom::Item(ClassItem::Type {
                    ty,
                    negate,
                    ascii: self.ascii,
                })
            }
            'p' | 'P' => ClassAtom::Item(self.parse_property(c == 'P')?),
            'b' => ClassAtom::Char('\x08'),
            c => ClassAtom::Char(self.escaped_char(c)?),
        })
    }
}

// Bounded by TREE_HEIGHT_LIMIT for every node the parser builds.
fn height(node: &Node) -> usize {
    match node {
        Node::Group { node, .. }
        | Node::Look { node, .. }
        | Node::Atomic(node)
        | Node::Repeat { node, .. } => 1 + height(node),
        Node::Concat(nodes) | Node::Alternate(nodes) => {
            1 + nodes.iter().map(height).max().unwrap_or(0)
        }
        Node::Empty
        | Node::Literal { .. }
        | Node::Any { .. }
        | Node::Class { .. }
        | Node::Assert(_)
        | Node::BackRef { .. }
        | Node::NamedBackRef { .. } => 1,
    }
}

/// Binds named back-references and checks numbered ones.
fn resolve(
    node: &mut Node,
    num_groups: usize,
    names: &[(String, usize)],
    pattern: &str,
) -> Result<(), RegexError> {
    match node {
        Node::BackRef { groups, .. } => {
            if groups.iter().any(|&g| g == 0 || g > num_groups) {
                return Err(RegexError::syntax(pattern, INVALID_BACKREF));
            }
        }
        Node::NamedBackRef { name, icase } => {
            let mut groups: Vec<usize> =
                names.iter().filter(|(n, _)| n == name).map(|(_, i)| *i).collect();
            if groups.is_empty() {
                return Err(RegexError::syntax(pattern, undefined_name_reference(name)));
            }
            groups.sort_unstable();
            *node = Node::BackRef { groups, icase: *icase };
        }
        Node::Group { node, .. }
        | Node::Look { node, .. }
        | Node::Atomic(node)
        | Node::Repeat { node, .. } => {
            resolve(node, num_groups, names, pattern)?;
        }
        Node::Concat(nodes) | Node::Alternate(nodes) => {
            for n in nodes {
                resolve(n, num_groups, names, pattern)?;
            }
        }
        Node::Empty
        | Node::Literal { .. }
        | Node::Any { .. }
        | Node::Class { .. }
        | Node::Assert(_) => {}
    }
    Ok(())
}
