//! Function definitions and calls.

use ecow::EcoString;

use super::stack::ensure_sufficient_stack;
use super::{Interpreter, Interrupt, Link, Mode};
use crate::api::native::NativeCall;
use crate::errors::ErrorKind;
use crate::lexer::{Lexer, Token};
use crate::values::{FunctionBody, RETURN, Value, ValueId, text};
use crate::{ToString, Vec};

impl Interpreter {
    /// Call `function` with the argument list at the current token.
    ///
    /// Each formal parameter is bound in a fresh scope frame: values without
    /// children are copied, objects, arrays and functions are shared. The
    /// frame also holds `this` (when called as a method) and the `return`
    /// slot that becomes the call's result.
    pub(crate) fn function_call(
        &mut self,
        mode: &mut Mode,
        function: &Link,
        parent: Option<ValueId>,
    ) -> Result<Link, Interrupt> {
        if !mode.is_evaluating() {
            self.skip_arguments()?;
            return Ok(function.clone());
        }

        let body = match self.heap.get(function.value) {
            Value::Function(body) => body.clone(),
            _ => {
                let name = self.name_of(function).to_string();
                return Err(self.fail(ErrorKind::NotAFunction { name }));
            }
        };

        self.lexer.match_token(Token::Char('('))?;
        let scope = self.alloc_held(Value::Object);
        if let Some(parent) = parent {
            self.heap.add_child_no_dup(scope, "this", parent);
        }

        let params: Vec<EcoString> = text::parameter_names(&self.heap, function.value)
            .map(EcoString::from)
            .collect();
        for param in &params {
            let value = if self.lexer.token != Token::Char(')') {
                let argument = self.base(mode)?;
                if self.lexer.token != Token::Char(')') {
                    self.lexer.match_token(Token::Char(','))?;
                }
                if self.heap.is_basic(argument.value) {
                    self.heap.deep_copy(argument.value)
                } else {
                    argument.value
                }
            } else {
                self.heap.alloc(Value::Undefined)
            };
            self.heap.add_child(scope, param.clone(), value);
        }
        while self.lexer.token != Token::Char(')') {
            self.base(mode)?;
            if self.lexer.token != Token::Char(')') {
                self.lexer.match_token(Token::Char(','))?;
            }
        }
        self.lexer.match_token(Token::Char(')'))?;

        let result = self.heap.alloc(Value::Undefined);
        self.heap.add_child(scope, RETURN, result);

        if self.depth >= self.options.max_depth {
            return Err(self.fail(ErrorKind::StackOverflow {
                depth: self.depth + 1,
                max_depth: self.options.max_depth,
            }));
        }
        self.push_scope(scope, false);
        self.depth += 1;
        tracing::debug!(function = %self.name_of(function), depth = self.depth, "call");

        let outcome = ensure_sufficient_stack(|| match body {
            FunctionBody::Native(native) => {
                let mut call = NativeCall::new(self, scope);
                native.call(&mut call)
            }
            FunctionBody::Script(source) => match Lexer::new(&source) {
                Ok(lexer) => self.with_lexer(lexer, |it| it.block(&mut Mode::Evaluate)),
                Err(error) => Err(error.into()),
            },
        });

        match &outcome {
            Err(Interrupt::Error(_)) => self.record_scope_dump(),
            // A native may have recovered from a failed nested eval.
            Ok(()) => self.clear_scope_dump(),
            Err(Interrupt::Throw(_)) => {}
        }
        self.pop_scope();
        self.depth -= 1;
        outcome?;

        let value = match self.heap.find_child(scope, RETURN) {
            Some(link) => link.value,
            None => self.heap.alloc(Value::Undefined),
        };
        Ok(Link::detached(self.hold(value)))
    }

    /// `function [name](params) { body }`: the body is parsed only to find
    /// its end and stored as text.
    pub(crate) fn function_definition(&mut self) -> Result<Link, Interrupt> {
        self.lexer.match_token(Token::Function)?;
        let mut name = EcoString::new();
        if self.lexer.token == Token::Id {
            name = EcoString::from(self.lexer.token_text.as_str());
            self.lexer.match_token(Token::Id)?;
        }

        let function = self.alloc_held(Value::Undefined);
        self.function_parameters(function)?;

        let body_start = self.lexer.token_start;
        self.block(&mut Mode::Skip)?;
        let body = self.lexer.text_since(body_start);
        self.heap.set(function, Value::script_function(body));
        Ok(Link::named(name, function))
    }

    /// `(a, b, c)`: formal parameters become undefined children of
    /// `function`.
    pub(crate) fn function_parameters(&mut self, function: ValueId) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Char('('))?;
        while self.lexer.token != Token::Char(')') {
            let param = self.lexer.token_text.clone();
            self.lexer.match_token(Token::Id)?;
            let placeholder = self.heap.alloc(Value::Undefined);
            self.heap.add_child_no_dup(function, &param, placeholder);
            if self.lexer.token != Token::Char(')') {
                self.lexer.match_token(Token::Char(','))?;
            }
        }
        Ok(self.lexer.match_token(Token::Char(')'))?)
    }

    /// Consume a parenthesized argument list without evaluating it.
    pub(crate) fn skip_arguments(&mut self) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Char('('))?;
        while self.lexer.token != Token::Char(')') {
            self.base(&mut Mode::Skip)?;
            if self.lexer.token != Token::Char(')') {
                self.lexer.match_token(Token::Char(','))?;
            }
        }
        Ok(self.lexer.match_token(Token::Char(')'))?)
    }
}
