//! Diagnostics for Zeno decoding and encoding.

use std::fmt;

use thiserror::Error;

use crate::position::Location;

/// Result type for Zeno codec operations.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Broad classification of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unterminated lexical token.
    Scan,
    /// Grammar violation: unexpected token or unexpected end of input.
    Syntax,
    /// Structurally valid input whose meaning is invalid.
    Semantic,
    /// A value tree the canonical encoder refuses to emit.
    Encode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Scan => write!(f, "scan error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Semantic => write!(f, "semantic error"),
            ErrorKind::Encode => write!(f, "encode error"),
        }
    }
}

/// A structured decode/encode failure.
///
/// Every failure raised while decoding carries the 1-based line and column
/// of the offending character. Encode failures name the offending value
/// instead, since a value tree has no source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Malformed or unterminated lexical token.
    #[error("scan error at line {line} column {column}: {message}")]
    Scan {
        message: String,
        line: usize,
        column: usize,
    },

    /// Grammar violation: unexpected token or unexpected end of input.
    #[error("syntax error at line {line} column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// Forbidden or duplicate map key, or a literal that failed
    /// value-level validation (bad calendar date, invalid base64).
    #[error("semantic error at line {line} column {column}: {message}")]
    Semantic {
        message: String,
        line: usize,
        column: usize,
    },

    /// A value tree the canonical encoder refuses to emit.
    #[error("encode error: {message}")]
    Encode { message: String },
}

impl Diagnostic {
    pub(crate) fn scan(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Scan {
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Syntax {
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }

    pub(crate) fn semantic(message: impl Into<String>, at: Location) -> Self {
        Diagnostic::Semantic {
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }

    pub(crate) fn encode(message: impl Into<String>) -> Self {
        Diagnostic::Encode {
            message: message.into(),
        }
    }

    /// The diagnostic's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Diagnostic::Scan { .. } => ErrorKind::Scan,
            Diagnostic::Syntax { .. } => ErrorKind::Syntax,
            Diagnostic::Semantic { .. } => ErrorKind::Semantic,
            Diagnostic::Encode { .. } => ErrorKind::Encode,
        }
    }

    /// Human-readable description, without the location prefix.
    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Scan { message, .. }
            | Diagnostic::Syntax { message, .. }
            | Diagnostic::Semantic { message, .. }
            | Diagnostic::Encode { message } => message,
        }
    }

    /// 1-based line of the failure, when it has a source position.
    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::Scan { line, .. }
            | Diagnostic::Syntax { line, .. }
            | Diagnostic::Semantic { line, .. } => Some(*line),
            Diagnostic::Encode { .. } => None,
        }
    }

    /// 1-based column of the failure, when it has a source position.
    pub fn column(&self) -> Option<usize> {
        match self {
            Diagnostic::Scan { column, .. }
            | Diagnostic::Syntax { column, .. }
            | Diagnostic::Semantic { column, .. } => Some(*column),
            Diagnostic::Encode { .. } => None,
        }
    }
}
