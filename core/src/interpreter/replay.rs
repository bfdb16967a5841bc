//! Re-runnable source spans.
//!
//! Loop conditions, loop bodies and `try` blocks are parsed once in the
//! main lexer and captured as a [`Replay`]: a sub-lexer over the span they
//! occupied. Each re-run rewinds it and swaps it in as the interpreter's
//! current lexer, so side effects in a condition happen on every iteration.

use super::Interpreter;
use super::error::Interrupt;
use crate::errors::ScriptError;
use crate::lexer::{Lexer, Token};

#[derive(Debug)]
pub struct Replay {
    lexer: Lexer,
    empty: bool,
}

impl Replay {
    /// Capture `[start, end of previous token)` of `lexer`.
    pub fn capture(lexer: &Lexer, start: usize) -> Result<Self, ScriptError> {
        let lexer = lexer.sub_lexer(start)?;
        let empty = lexer.token == Token::Eof;
        Ok(Self { lexer, empty })
    }

    /// Whether the captured span holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

impl Interpreter {
    /// Run `f` with `replay` rewound and installed as the current lexer.
    /// The previous lexer is put back whatever `f` returns.
    pub(crate) fn replay<T>(
        &mut self,
        replay: &mut Replay,
        f: impl FnOnce(&mut Self) -> Result<T, Interrupt>,
    ) -> Result<T, Interrupt> {
        replay.lexer.reset()?;
        core::mem::swap(&mut self.lexer, &mut replay.lexer);
        let result = f(self);
        core::mem::swap(&mut self.lexer, &mut replay.lexer);
        result
    }

    /// Run `f` over a fresh lexer, restoring the current one afterwards.
    pub(crate) fn with_lexer<T>(
        &mut self,
        lexer: Lexer,
        f: impl FnOnce(&mut Self) -> Result<T, Interrupt>,
    ) -> Result<T, Interrupt> {
        let saved = core::mem::replace(&mut self.lexer, lexer);
        let result = f(self);
        self.lexer = saved;
        result
    }
}
