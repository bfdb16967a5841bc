//! Registration of host functions and properties on Root.

use super::{Interpreter, Interrupt};
use crate::api::native::{NativeCall, NativeResult};
use crate::lexer::{Lexer, Token};
use crate::values::{NativeFunction, RETURN, Value};

impl Interpreter {
    /// Bind `function` at the path named by a `function a.b.name(x, y)`
    /// signature. Missing namespace objects are created; an existing
    /// binding at the path is replaced.
    pub fn add_native(&mut self, signature: &str, function: NativeFunction) -> Result<(), Interrupt> {
        let lexer = Lexer::new(signature)?;
        self.with_lexer(lexer, |it| {
            it.lexer.match_token(Token::Function)?;
            let mut path = it.lexer.token_text.clone();
            it.lexer.match_token(Token::Id)?;
            while it.lexer.token == Token::Char('.') {
                it.lexer.match_token(Token::Char('.'))?;
                path.push('.');
                path.push_str(&it.lexer.token_text);
                it.lexer.match_token(Token::Id)?;
            }

            let native = it.alloc_held(Value::native(function));
            it.function_parameters(native)?;
            it.lexer.match_token(Token::Eof)?;

            let (parent, name) = it.vivify_parent(&path);
            it.heap.add_child_no_dup(parent, name, native);
            tracing::debug!(path = %path, "registered native function");
            Ok(())
        })
    }

    /// Run `callback` once and store the value it returns at the dotted
    /// `path`.
    pub fn add_native_property(
        &mut self,
        path: &str,
        callback: impl FnOnce(&mut NativeCall<'_>) -> NativeResult,
    ) -> Result<(), Interrupt> {
        // Held outside the temp stack, which a top-level eval in the
        // callback clears.
        let scope = self.heap.alloc(Value::Object);
        self.heap.retain(scope);
        let slot = self.heap.alloc(Value::Undefined);
        self.heap.add_child(scope, RETURN, slot);

        let result = callback(&mut NativeCall::new(self, scope));
        if result.is_ok() {
            let value = match self.heap.find_child(scope, RETURN) {
                Some(link) => link.value,
                None => self.heap.alloc(Value::Undefined),
            };
            let (parent, name) = self.vivify_parent(path);
            self.heap.add_child_no_dup(parent, name, value);
        }
        self.heap.release(scope);
        result
    }
}
