// engine/backtrack/messages.rs - Diagnostic texts.
//
// Same wording as Oniguruma's error table so callers that match on messages
// see familiar text.

pub const PREMATURE_END_OF_CHAR_CLASS: &str = "premature end of char-class";
pub const END_PATTERN_AT_ESCAPE: &str = "end pattern at escape";
pub const TARGET_OF_REPEAT_OPERATOR_NOT_SPECIFIED: &str = "target of repeat operator is not specified";
pub const TARGET_OF_REPEAT_OPERATOR_INVALID: &str = "target of repeat operator is invalid";
pub const UNMATCHED_CLOSE_PARENTHESIS: &str = "unmatched close parenthesis";
pub const END_PATTERN_WITH_UNMATCHED_PARENTHESIS: &str = "end pattern with unmatched parenthesis";
pub const END_PATTERN_IN_GROUP: &str = "end pattern in group";
pub const UNDEFINED_GROUP_OPTION: &str = "undefined group option";
pub const INVALID_POSIX_BRACKET_TYPE: &str = "invalid POSIX bracket type";
pub const INVALID_LOOK_BEHIND_PATTERN: &str = "invalid pattern in look-behind";
pub const TOO_BIG_NUMBER_FOR_REPEAT_RANGE: &str = "too big number for repeat range";
pub const UPPER_SMALLER_THAN_LOWER_IN_REPEAT_RANGE: &str = "upper is smaller than lower in repeat range";
pub const EMPTY_RANGE_IN_CHAR_CLASS: &str = "empty range in char class";
pub const TOO_BIG_WIDE_CHAR_VALUE: &str = "too big wide-char value";
pub const TOO_LONG_WIDE_CHAR_VALUE: &str = "too long wide-char value";
pub const INVALID_CODE_POINT_VALUE: &str = "invalid code point value";
pub const INVALID_BACKREF: &str = "invalid backref number/name";
pub const EMPTY_GROUP_NAME: &str = "group name is empty";
pub const INVALID_CHAR_PROPERTY_NAME: &str = "invalid character property name";
pub const TOO_BIG_PROGRAM: &str = "too big program";
pub const PARSE_DEPTH_LIMIT_OVER: &str = "parse depth limit over";

pub fn invalid_group_name(name: &str) -> String {
    format!("invalid group name <{}>", name)
}

pub fn undefined_name_reference(name: &str) -> String {
    format!("undefined name <{}> reference", name)
}

pub fn invalid_char_property_name(name: &str) -> String {
    format!("{}: {}", INVALID_CHAR_PROPERTY_NAME, name)
}
