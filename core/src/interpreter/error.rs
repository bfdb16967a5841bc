//! Non-local exits from evaluation.
//!
//! - **Errors** (syntax, operator and resource failures) are fatal: they
//!   unwind to the `execute`/`eval_complex` boundary and skip `finally`.
//! - **Throws** carry a script value and are intercepted by the nearest
//!   `try`/`catch`.

use crate::Box;
use crate::errors::ScriptError;
use crate::values::ValueId;

#[derive(Debug)]
pub enum Interrupt {
    Error(Box<ScriptError>),
    Throw(Thrown),
}

/// A thrown script value.
///
/// Holds one reference on `value`; whoever consumes the throw releases it.
/// `origin` locates the `throw` for reporting when nothing catches it.
#[derive(Debug)]
pub struct Thrown {
    pub value: ValueId,
    pub origin: Box<ScriptError>,
}

impl Interrupt {
    pub fn is_throw(&self) -> bool {
        matches!(self, Interrupt::Throw(_))
    }
}

impl From<ScriptError> for Interrupt {
    fn from(error: ScriptError) -> Self {
        Interrupt::Error(Box::new(error))
    }
}
