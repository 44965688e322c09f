// error.rs - Error type for pattern compilation.
//
// Compilation is the only fallible step of the API. Everything downstream of a
// compiled pattern (find, replace, split, template expansion) degrades to empty
// or literal output instead of failing.

use std::fmt;

/// Error returned when a pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// The pattern is malformed. `message` is the engine's diagnostic,
    /// unmodified.
    Syntax { pattern: String, message: String },
}

impl RegexError {
    /// Creates a syntax error for `pattern` carrying the engine's `message`.
    pub fn syntax(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        RegexError::Syntax {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// The engine's diagnostic text.
    pub fn message(&self) -> &str {
        match self {
            RegexError::Syntax { message, .. } => message,
        }
    }

    /// The pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            RegexError::Syntax { pattern, .. } => pattern,
        }
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for RegexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_verbatim() {
        let err = RegexError::syntax("(a", "end pattern with unmatched parenthesis");
        assert_eq!(err.to_string(), "end pattern with unmatched parenthesis");
        assert_eq!(err.message(), "end pattern with unmatched parenthesis");
        assert_eq!(err.pattern(), "(a");
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> =
            Box::new(RegexError::syntax("*", "target of repeat operator is not specified"));
        assert_eq!(err.to_string(), "target of repeat operator is not specified");
    }
}
