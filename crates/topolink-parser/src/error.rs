//! Errors reported while parsing anchor references.

use thiserror::Error;

/// An anchor reference that could not be parsed.
///
/// Carries the offending text and the byte offset (within the trimmed
/// text) where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid anchor reference `{input}` at offset {offset}: {message}")]
pub struct ParseError {
    input: String,
    offset: usize,
    message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(input: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "unexpected input".to_string()
        } else {
            message.replace('\n', "; ")
        };
        Self {
            input: input.into(),
            offset,
            message,
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset where parsing stopped.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_gets_default() {
        let err = ParseError::new("??", 0, "");
        assert_eq!(err.message(), "unexpected input");
    }

    #[test]
    fn test_display() {
        let err = ParseError::new("@b:1", 4, "expected `:`");
        assert_eq!(
            err.to_string(),
            "invalid anchor reference `@b:1` at offset 4: expected `:`"
        );
    }
}
