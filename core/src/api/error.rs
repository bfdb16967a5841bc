//! Public error types for the Sprig API.
//!
//! Internal [`ScriptError`]s are converted to these at the engine boundary,
//! sorted by what went wrong: the script text, the running script, or a
//! resource limit.

use core::fmt;
use core::ops::Range;

use crate::errors::ScriptError;
use crate::{String, ToString, Vec};

/// Public error type for all Sprig operations.
#[derive(Debug)]
pub enum Error {
    /// Invalid API usage (e.g., a malformed native signature).
    Api(String),

    /// The script text could not be lexed or parsed.
    Syntax { diagnostic: Diagnostic },

    /// Evaluation failed: an unsupported operator, a call to a
    /// non-function, a native error or an uncaught `throw`.
    Runtime { diagnostic: Diagnostic },

    /// Resource limits exceeded (call depth or loop iterations).
    ResourceExceeded { diagnostic: Diagnostic },

    /// A state snapshot could not be written or restored.
    Snapshot(String),
}

impl Error {
    /// The located diagnostic, for errors raised by a script.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::Syntax { diagnostic }
            | Error::Runtime { diagnostic }
            | Error::ResourceExceeded { diagnostic } => Some(diagnostic),
            Error::Api(_) | Error::Snapshot(_) => None,
        }
    }

    /// Classify a script error, attaching the scope stack captured when it
    /// was raised.
    pub fn from_script(error: ScriptError, scope_dump: Vec<String>) -> Self {
        let syntax = error.kind.is_syntax();
        let resource = error.kind.is_resource_limit();
        let diagnostic = Diagnostic::from_script(error, scope_dump);
        if syntax {
            Error::Syntax { diagnostic }
        } else if resource {
            Error::ResourceExceeded { diagnostic }
        } else {
            Error::Runtime { diagnostic }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Api(msg) => write!(f, "API error: {}", msg),
            Error::Syntax { diagnostic }
            | Error::Runtime { diagnostic }
            | Error::ResourceExceeded { diagnostic } => write!(f, "{}", diagnostic),
            Error::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ScriptError> for Error {
    fn from(error: ScriptError) -> Self {
        Error::from_script(error, Vec::new())
    }
}

/// A located error message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Byte range of the offending token within `source`.
    pub span: Range<usize>,

    /// 1-based.
    pub line: usize,

    /// 1-based, in characters.
    pub column: usize,

    /// The text the error was found in. For errors inside a script
    /// function this is the function's body.
    pub source: String,

    /// Error code (e.g., "S002") for documentation lookup.
    pub code: Option<String>,

    /// The scope stack when the error was raised, outermost first.
    pub scope_dump: Vec<String>,
}

impl Diagnostic {
    fn from_script(error: ScriptError, scope_dump: Vec<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: error.message(),
            span: error.span.clone(),
            line: error.line,
            column: error.column,
            source: error.script.to_string(),
            code: Some(error.kind.code().to_string()),
            scope_dump,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ERROR on line {} column {} [{}]",
            self.line, self.column, self.message
        )
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
