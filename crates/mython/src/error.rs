//! Error model (spec.md §7).
//!
//! Following the teacher's own `ExcType`/`RunError` split: [`ExcKind`] is a
//! bare tag (just the error's name, for matching), [`MythonError`] pairs a
//! tag with a human-readable message. There is no `try`/`except` in Mython,
//! so every error simply unwinds to the driver.

use std::fmt;

use strum::Display;

/// The kind of error, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExcKind {
    LexicalError,
    NameError,
    AttributeError,
    TypeError,
    ArityError,
    ArithmeticError,
    RuntimeError,
    /// Failure in the ambient (non-spec) parser that builds the AST for the CLI and tests.
    ParseError,
}

/// A Mython runtime or lexical error: a kind (for `matches!`) plus a message (for humans).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MythonError {
    pub kind: ExcKind,
    pub message: String,
}

impl MythonError {
    pub fn new(kind: ExcKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn lexical(message: impl Into<String>) -> Self {
        Self::new(ExcKind::LexicalError, message)
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ExcKind::NameError, message)
    }

    pub fn attribute(message: impl Into<String>) -> Self {
        Self::new(ExcKind::AttributeError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ExcKind::TypeError, message)
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::new(ExcKind::ArityError, message)
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        Self::new(ExcKind::ArithmeticError, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ExcKind::RuntimeError, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ExcKind::ParseError, message)
    }
}

impl fmt::Display for MythonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for MythonError {}

/// Result alias used throughout lexing and evaluation.
pub type MythonResult<T> = Result<T, MythonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = MythonError::name("'x' is not defined");
        assert_eq!(err.to_string(), "NameError: 'x' is not defined");
    }
}
