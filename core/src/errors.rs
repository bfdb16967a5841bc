//! Script-level errors with source positions.
//!
//! Every lex, parse and evaluation failure is a [`ScriptError`]: an
//! [`ErrorKind`] plus the position of the token the lexer was sitting on.
//! The public [`crate::api::Error`] is built from these at the engine
//! boundary.

use alloc::rc::Rc;
use core::ops::Range;

use thiserror::Error;

use crate::String;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("Unexpected token type. Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Invalid regular expression {literal}: {message}")]
    InvalidRegex { literal: String, message: String },

    #[error("Invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("Operation not supported on the {datatype} datatype")]
    UnsupportedOperation { datatype: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("{name} is not a function")]
    NotAFunction { name: String },

    #[error("Uncaught exception: {description}")]
    UncaughtThrow { description: String },

    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    #[error("Loop iteration limit of {limit} exceeded")]
    IterationLimit { limit: usize },

    #[error("{0}")]
    Native(String),
}

impl ErrorKind {
    /// Stable diagnostic code for documentation lookup.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRegex { .. } | ErrorKind::InvalidNumber { .. } => "S001",
            ErrorKind::UnexpectedToken { .. } => "S002",
            ErrorKind::UnsupportedOperation { .. } => "R001",
            ErrorKind::NotAFunction { .. } => "R002",
            ErrorKind::UncaughtThrow { .. } => "R003",
            ErrorKind::DivisionByZero => "R004",
            ErrorKind::Native(_) => "R005",
            ErrorKind::StackOverflow { .. } => "X001",
            ErrorKind::IterationLimit { .. } => "X002",
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnexpectedToken { .. }
                | ErrorKind::InvalidRegex { .. }
                | ErrorKind::InvalidNumber { .. }
        )
    }

    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            ErrorKind::StackOverflow { .. } | ErrorKind::IterationLimit { .. }
        )
    }
}

/// An error raised while lexing, parsing or evaluating script text.
#[derive(Debug, Clone, Error)]
#[error("ERROR on line {line} column {column} [{kind}]")]
pub struct ScriptError {
    pub kind: ErrorKind,
    /// Byte range of the offending token within `script`.
    pub span: Range<usize>,
    /// 1-based.
    pub line: usize,
    /// 1-based, counted in characters.
    pub column: usize,
    /// The text the lexer was reading: the top-level script or a function body.
    pub script: Rc<str>,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, script: Rc<str>, span: Range<usize>) -> Self {
        let (line, column) = line_column(&script, span.start);
        Self {
            kind,
            span,
            line,
            column,
            script,
        }
    }

    pub fn message(&self) -> String {
        alloc::format!("{}", self.kind)
    }
}

/// Compute the 1-based line and column of a byte offset.
pub fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..floor_char_boundary(text, offset)];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_first_line() {
        assert_eq!(line_column("var x = 1;", 4), (1, 5));
    }

    #[test]
    fn test_line_column_after_newlines() {
        let text = "var a;\nvar b;\n  oops";
        assert_eq!(line_column(text, text.find("oops").unwrap()), (3, 3));
    }

    #[test]
    fn test_display_format() {
        let err = ScriptError::new(
            ErrorKind::NotAFunction { name: "foo".into() },
            Rc::from("foo();"),
            3..4,
        );
        assert_eq!(err.to_string(), "ERROR on line 1 column 4 [foo is not a function]");
        assert_eq!(err.kind.code(), "R002");
    }
}
