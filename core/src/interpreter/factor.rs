//! Primary expressions and the postfix chain of calls, member access and
//! indexing.

use super::{Interpreter, Interrupt, Link, Mode};
use crate::lexer::Token;
use crate::values::{Kind, Value, ValueId};
use crate::ToString;

impl Interpreter {
    pub(crate) fn factor(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let evaluating = mode.is_evaluating();
        match self.lexer.token {
            Token::Char('(') => {
                self.lexer.match_token(Token::Char('('))?;
                let inner = self.base(mode)?;
                self.lexer.match_token(Token::Char(')'))?;
                Ok(inner)
            }
            Token::True | Token::False => {
                let value = Value::bool(self.lexer.token == Token::True);
                self.lexer.next_token()?;
                Ok(self.detached(value))
            }
            Token::Null => {
                self.lexer.match_token(Token::Null)?;
                Ok(self.detached(Value::Null))
            }
            Token::Undefined => {
                self.lexer.match_token(Token::Undefined)?;
                Ok(self.undefined_link())
            }
            Token::Int | Token::Float | Token::Regex => self.literal(evaluating),
            Token::Str => {
                let value = Value::string(self.lexer.token_text.as_str());
                self.lexer.match_token(Token::Str)?;
                Ok(self.detached(value))
            }
            Token::Id => self.identifier(mode),
            Token::Char('{') => self.object_literal(mode),
            Token::Char('[') => self.array_literal(mode),
            Token::Function => {
                let function = self.function_definition()?;
                if !function.name.is_empty() {
                    tracing::warn!(
                        name = %function.name,
                        "function expressions are not supposed to have a name"
                    );
                }
                Ok(function)
            }
            Token::New => self.construct(mode),
            _ => {
                self.lexer.match_token(Token::Eof)?;
                Ok(self.undefined_link())
            }
        }
    }

    /// Numeric and regex literals, parsed from the token text.
    fn literal(&mut self, evaluating: bool) -> Result<Link, Interrupt> {
        let kind = match self.lexer.token {
            Token::Int => Kind::Int,
            Token::Float => Kind::Double,
            _ => Kind::Regexp,
        };
        let value = if evaluating {
            Value::from_raw(&self.lexer.token_text, kind).map_err(|kind| self.fail(kind))?
        } else {
            Value::Undefined
        };
        self.lexer.next_token()?;
        Ok(self.detached(value))
    }

    /// An identifier followed by any number of `(args)`, `.name` and
    /// `[index]` suffixes.
    fn identifier(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let name = self.lexer.token_text.clone();
        let mut link = if mode.is_evaluating() {
            match self.find_in_scopes(&name) {
                Some(found) => found,
                None => Link::named(name.as_str(), self.alloc_held(Value::Undefined)),
            }
        } else {
            self.undefined_link()
        };
        self.lexer.match_token(Token::Id)?;

        let mut parent: Option<ValueId> = None;
        loop {
            match self.lexer.token {
                Token::Char('(') => {
                    link = self.function_call(mode, &link, parent)?;
                }
                Token::Char('.') => {
                    self.lexer.match_token(Token::Char('.'))?;
                    if mode.is_evaluating() {
                        let member = self.lexer.token_text.clone();
                        parent = Some(link.value);
                        link = self.member(link.value, &member);
                    }
                    self.lexer.match_token(Token::Id)?;
                }
                Token::Char('[') => {
                    self.lexer.match_token(Token::Char('['))?;
                    let index = self.base(mode)?;
                    self.lexer.match_token(Token::Char(']'))?;
                    if mode.is_evaluating() {
                        let key = self.heap.get(index.value).to_display_string();
                        parent = Some(link.value);
                        link = match self.child_link_or_create(link.value, &key) {
                            Some(child) => child,
                            None => self.undefined_link(),
                        };
                    }
                }
                _ => return Ok(link),
            }
        }
    }

    /// Resolve `object.name`: an own child, the `length` of an array or
    /// string, a class member, or else a new undefined child.
    fn member(&mut self, object: ValueId, name: &str) -> Link {
        if let Some(child) = self.child_link(object, name) {
            return child;
        }
        if name == "length" {
            let length = match self.heap.get(object) {
                Value::Array => Some(self.heap.array_len(object)),
                Value::Str(text) => Some(text.chars().count() as i32),
                _ => None,
            };
            if let Some(length) = length {
                return self.detached(Value::Int(length));
            }
        }
        if let Some(inherited) = self.find_in_classes(object, name) {
            return inherited;
        }
        match self.child_link_or_create(object, name) {
            Some(child) => child,
            None => self.undefined_link(),
        }
    }

    /// `{ key: value, "key": value }`.
    fn object_literal(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let object = self.alloc_held(Value::Object);
        self.lexer.match_token(Token::Char('{'))?;
        while self.lexer.token != Token::Char('}') {
            let key = self.lexer.token_text.clone();
            if self.lexer.token == Token::Str {
                self.lexer.match_token(Token::Str)?;
            } else {
                self.lexer.match_token(Token::Id)?;
            }
            self.lexer.match_token(Token::Char(':'))?;

            let value = self.base(mode)?;
            if mode.is_evaluating() {
                self.heap.add_child_no_dup(object, &key, value.value);
            }
            if self.lexer.token != Token::Char('}') {
                self.lexer.match_token(Token::Char(','))?;
            }
        }
        self.lexer.match_token(Token::Char('}'))?;
        Ok(Link::detached(object))
    }

    /// `[a, b, c]`, stored as children named `"0"`, `"1"`, ...
    fn array_literal(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let array = self.alloc_held(Value::Array);
        self.lexer.match_token(Token::Char('['))?;
        let mut index = 0usize;
        while self.lexer.token != Token::Char(']') {
            let element = self.base(mode)?;
            if mode.is_evaluating() {
                self.heap.add_child(array, index.to_string(), element.value);
            }
            if self.lexer.token != Token::Char(']') {
                self.lexer.match_token(Token::Char(','))?;
            }
            index += 1;
        }
        self.lexer.match_token(Token::Char(']'))?;
        Ok(Link::detached(array))
    }

    /// `new Name(args)`.
    ///
    /// A function is called as a constructor with `this` bound to a fresh
    /// object, which is the result whatever the function returns. Any other
    /// value becomes the new object's `prototype`.
    fn construct(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        self.lexer.match_token(Token::New)?;
        let class_name = self.lexer.token_text.clone();
        self.lexer.match_token(Token::Id)?;

        let class = if mode.is_evaluating() {
            self.find_in_scopes(&class_name)
        } else {
            None
        };
        let Some(class) = class else {
            if mode.is_evaluating() {
                tracing::warn!(class = %class_name, "not a valid class name");
            }
            if self.lexer.token == Token::Char('(') {
                self.skip_arguments()?;
            }
            return Ok(self.undefined_link());
        };

        let object = self.alloc_held(Value::Object);
        if self.heap.get(class.value).is_function() {
            self.function_call(mode, &class, Some(object))?;
        } else {
            self.heap.add_prototype_link(object, class.value);
            if self.lexer.token == Token::Char('(') {
                self.skip_arguments()?;
            }
        }
        Ok(Link::detached(object))
    }
}
