//! Statements and control flow.

use ecow::EcoString;

use super::replay::Replay;
use super::stack::ensure_sufficient_stack;
use super::{Interpreter, Interrupt, Link, Mode, Slot};
use crate::errors::ErrorKind;
use crate::lexer::Token;
use crate::values::{RETURN, Value, ValueId, values_equal};
use crate::format;

impl Interpreter {
    /// Parse one statement, evaluating it when `mode` says so.
    ///
    /// Temporaries made while evaluating the statement are released when
    /// it ends.
    pub(crate) fn statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        let mark = self.temps_mark();
        let result = ensure_sufficient_stack(|| self.statement_inner(mode));
        self.release_temps(mark);
        result
    }

    fn statement_inner(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        match self.lexer.token {
            Token::Char('{') => self.block(mode),
            Token::Char(';') => Ok(self.lexer.match_token(Token::Char(';'))?),
            Token::Var | Token::Const => self.declaration(mode),
            Token::If => self.if_statement(mode),
            Token::While => self.while_loop(mode),
            Token::Do => self.do_while_loop(mode),
            Token::For => self.for_loop(mode),
            Token::Return => self.return_statement(mode),
            Token::Break | Token::Continue => {
                let signal = if self.lexer.token == Token::Break {
                    Mode::Breaking
                } else {
                    Mode::Continuing
                };
                self.lexer.next_token()?;
                self.lexer.match_token(Token::Char(';'))?;
                if mode.is_evaluating() {
                    *mode = signal;
                }
                Ok(())
            }
            Token::Function => {
                let function = self.function_definition()?;
                if mode.is_evaluating() && !function.name.is_empty() {
                    let scope = self.declaration_scope();
                    self.heap.add_child_no_dup(scope, &function.name, function.value);
                }
                Ok(())
            }
            Token::Try => self.try_statement(mode),
            Token::Throw => self.throw_statement(mode),
            Token::Switch => self.switch_statement(mode),
            _ => {
                self.base(mode)?;
                Ok(self.lexer.match_token(Token::Char(';'))?)
            }
        }
    }

    /// `{ statement* }`. Blocks share the enclosing scope frame.
    pub(crate) fn block(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Char('{'))?;
        while !matches!(self.lexer.token, Token::Char('}') | Token::Eof) {
            self.statement(mode)?;
        }
        Ok(self.lexer.match_token(Token::Char('}'))?)
    }

    /// `var`/`const` with one or more comma-separated, possibly dotted,
    /// names and optional initializers.
    fn declaration(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        let constant = self.lexer.token == Token::Const;
        self.lexer.next_token()?;

        while self.lexer.token != Token::Char(';') {
            let name = self.lexer.token_text.clone();
            self.lexer.match_token(Token::Id)?;
            let mut target = None;
            if mode.is_evaluating() {
                let scope = self.declaration_scope();
                target = self.child_link_or_create(scope, &name);
            }

            while self.lexer.token == Token::Char('.') {
                self.lexer.match_token(Token::Char('.'))?;
                let name = self.lexer.token_text.clone();
                self.lexer.match_token(Token::Id)?;
                if let Some(parent) = target.as_ref().map(|link| link.value) {
                    target = self.child_link_or_create(parent, &name);
                }
            }

            if self.lexer.token == Token::Char('=') {
                self.lexer.match_token(Token::Char('='))?;
                let value = self.base(mode)?;
                if let Some(target) = target.as_mut() {
                    // A `const` statement re-run by a loop re-initialises its binding.
                    if target.read_only && !constant {
                        return Err(self.const_violation(&target.name));
                    }
                    self.replace_link(target, value.value);
                }
            }

            if constant {
                if let Some(Link {
                    slot: Slot::Child { parent, link },
                    ..
                }) = target
                {
                    self.heap.set_read_only(parent, link, true);
                }
            }

            if self.lexer.token != Token::Char(';') {
                self.lexer.match_token(Token::Char(','))?;
            }
        }
        Ok(self.lexer.match_token(Token::Char(';'))?)
    }

    pub(crate) fn const_violation(&mut self, name: &str) -> Interrupt {
        let message = format!("TypeError: Assignment to constant variable '{}'", name);
        self.throw_value(Value::string(message))
    }

    fn if_statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::If)?;
        self.lexer.match_token(Token::Char('('))?;
        let condition = self.base(mode)?;
        self.lexer.match_token(Token::Char(')'))?;

        let evaluating = mode.is_evaluating();
        let taken = evaluating && self.truthy(&condition);
        self.branch(mode, taken)?;

        if self.lexer.token == Token::Else {
            self.lexer.match_token(Token::Else)?;
            self.branch(mode, evaluating && !taken)?;
        }
        Ok(())
    }

    /// Run a statement with `mode` when `taken`, otherwise skip it.
    fn branch(&mut self, mode: &mut Mode, taken: bool) -> Result<(), Interrupt> {
        if taken {
            self.statement(mode)
        } else {
            self.statement(&mut Mode::Skip)
        }
    }

    fn count_iteration(&self, iterations: &mut usize) -> Result<(), Interrupt> {
        *iterations += 1;
        match self.options.max_iterations {
            Some(limit) if *iterations > limit => {
                Err(self.fail(ErrorKind::IterationLimit { limit }))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate a replayed condition, releasing its temporaries.
    fn replay_condition(&mut self, condition: &mut Replay, mode: &mut Mode) -> Result<bool, Interrupt> {
        if condition.is_empty() {
            return Ok(true);
        }
        let mark = self.temps_mark();
        let result = self.replay(condition, |it| {
            let value = it.base(mode)?;
            Ok(it.truthy(&value))
        });
        self.release_temps(mark);
        result
    }

    fn replay_iterator(&mut self, iterator: &mut Replay, mode: &mut Mode) -> Result<(), Interrupt> {
        if iterator.is_empty() {
            return Ok(());
        }
        let mark = self.temps_mark();
        let result = self.replay(iterator, |it| it.base(mode).map(|_| ()));
        self.release_temps(mark);
        result
    }

    fn while_loop(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::While)?;
        self.lexer.match_token(Token::Char('('))?;
        let condition_start = self.lexer.token_start;
        let first = self.base(mode)?;
        let mut looping = mode.is_evaluating() && self.truthy(&first);
        let mut condition = Replay::capture(&self.lexer, condition_start)?;
        self.lexer.match_token(Token::Char(')'))?;

        let body_start = self.lexer.token_start;
        self.branch(mode, looping)?;
        let mut body = Replay::capture(&self.lexer, body_start)?;
        if looping {
            looping = mode.end_iteration();
        }

        let mut iterations = 1;
        while looping {
            self.count_iteration(&mut iterations)?;
            if !self.replay_condition(&mut condition, mode)? {
                break;
            }
            self.replay(&mut body, |it| it.statement(mode))?;
            looping = mode.end_iteration();
        }
        Ok(())
    }

    fn do_while_loop(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Do)?;
        let evaluating = mode.is_evaluating();
        let body_start = self.lexer.token_start;
        self.statement(mode)?;
        let mut body = Replay::capture(&self.lexer, body_start)?;
        let mut looping = evaluating && mode.end_iteration();

        self.lexer.match_token(Token::While)?;
        self.lexer.match_token(Token::Char('('))?;
        let condition_start = self.lexer.token_start;
        if looping {
            let first = self.base(mode)?;
            looping = self.truthy(&first);
        } else {
            self.base(&mut Mode::Skip)?;
        }
        let mut condition = Replay::capture(&self.lexer, condition_start)?;
        self.lexer.match_token(Token::Char(')'))?;
        if self.lexer.token == Token::Char(';') {
            self.lexer.match_token(Token::Char(';'))?;
        }

        let mut iterations = 1;
        while looping {
            self.count_iteration(&mut iterations)?;
            self.replay(&mut body, |it| it.statement(mode))?;
            if !mode.end_iteration() {
                break;
            }
            looping = self.replay_condition(&mut condition, mode)?;
        }
        Ok(())
    }

    /// `for (init; condition; iterator) body`. Either clause after the
    /// initializer may be empty; an empty condition is true.
    fn for_loop(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::For)?;
        self.lexer.match_token(Token::Char('('))?;
        self.statement(mode)?;

        let condition_start = self.lexer.token_start;
        let mut looping = if self.lexer.token == Token::Char(';') {
            mode.is_evaluating()
        } else {
            let first = self.base(mode)?;
            mode.is_evaluating() && self.truthy(&first)
        };
        let mut condition = Replay::capture(&self.lexer, condition_start)?;
        self.lexer.match_token(Token::Char(';'))?;

        let iterator_start = self.lexer.token_start;
        if self.lexer.token != Token::Char(')') {
            self.base(&mut Mode::Skip)?;
        }
        let mut iterator = Replay::capture(&self.lexer, iterator_start)?;
        self.lexer.match_token(Token::Char(')'))?;

        let body_start = self.lexer.token_start;
        self.branch(mode, looping)?;
        let mut body = Replay::capture(&self.lexer, body_start)?;

        if looping {
            looping = mode.end_iteration();
            if looping {
                self.replay_iterator(&mut iterator, mode)?;
            }
        }

        let mut iterations = 1;
        while looping {
            self.count_iteration(&mut iterations)?;
            if !self.replay_condition(&mut condition, mode)? {
                break;
            }
            self.replay(&mut body, |it| it.statement(mode))?;
            looping = mode.end_iteration();
            if looping {
                self.replay_iterator(&mut iterator, mode)?;
            }
        }
        Ok(())
    }

    /// `return [expr];` writes the nearest `return` slot and unwinds to the
    /// enclosing call.
    fn return_statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Return)?;
        let value = if self.lexer.token != Token::Char(';') {
            Some(self.base(mode)?)
        } else {
            None
        };

        if mode.is_evaluating() {
            let frame = self
                .scopes
                .iter()
                .rev()
                .map(|scope| scope.value)
                .find(|&frame| self.heap.find_child(frame, RETURN).is_some());
            match frame {
                Some(frame) => {
                    let value = match value {
                        Some(link) => link.value,
                        None => self.alloc_held(Value::Undefined),
                    };
                    if let Some(mut slot) = self.child_link(frame, RETURN) {
                        self.replace_link(&mut slot, value);
                    }
                    *mode = Mode::Returning;
                }
                None => tracing::warn!("return statement outside of a function"),
            }
        }
        Ok(self.lexer.match_token(Token::Char(';'))?)
    }

    fn throw_statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Throw)?;
        let value = if self.lexer.token != Token::Char(';') {
            Some(self.base(mode)?)
        } else {
            None
        };
        if !mode.is_evaluating() {
            return Ok(self.lexer.match_token(Token::Char(';'))?);
        }
        let value = match value {
            Some(link) => link.value,
            None => self.alloc_held(Value::Undefined),
        };
        Err(self.throw_id(value))
    }

    /// `try { } [catch (name) { }] [finally { }]`.
    ///
    /// All three blocks are captured first and then replayed. A throw from
    /// the `try` block runs `catch` with the thrown value bound in a frame
    /// of its own. `finally` runs after both, including when a throw or a
    /// `return`/`break`/`continue` is passing through; fatal errors skip it.
    fn try_statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Try)?;
        let mut try_block = self.capture_block()?;

        let mut catch: Option<(EcoString, Replay)> = None;
        if self.lexer.token == Token::Catch {
            self.lexer.match_token(Token::Catch)?;
            self.lexer.match_token(Token::Char('('))?;
            let name = EcoString::from(self.lexer.token_text.as_str());
            self.lexer.match_token(Token::Id)?;
            self.lexer.match_token(Token::Char(')'))?;
            catch = Some((name, self.capture_block()?));
        }

        let mut finally = None;
        if self.lexer.token == Token::Finally {
            self.lexer.match_token(Token::Finally)?;
            finally = Some(self.capture_block()?);
        }

        if catch.is_none() && finally.is_none() {
            return Err(self.fail(ErrorKind::UnexpectedToken {
                expected: Token::Catch.to_string(),
                found: self.lexer.token.to_string(),
            }));
        }

        if !mode.is_evaluating() {
            return Ok(());
        }

        let mut outcome = self.replay(&mut try_block, |it| it.block(mode));
        if let Some((name, body)) = catch.as_mut() {
            if let Err(Interrupt::Throw(thrown)) = outcome {
                *mode = Mode::Evaluate;
                outcome = self.run_catch(name.as_str(), body, thrown.value, mode);
            }
        }

        let Some(mut finally) = finally else {
            return outcome;
        };
        if let Err(Interrupt::Error(_)) = outcome {
            return outcome;
        }

        let pending = *mode;
        *mode = Mode::Evaluate;
        let finished = self.replay(&mut finally, |it| it.block(mode));
        if finished.is_ok() && *mode == Mode::Evaluate {
            *mode = pending;
            return outcome;
        }
        if let Err(superseded) = outcome {
            self.into_error(superseded);
        }
        finished
    }

    fn capture_block(&mut self) -> Result<Replay, Interrupt> {
        let start = self.lexer.token_start;
        self.block(&mut Mode::Skip)?;
        Ok(Replay::capture(&self.lexer, start)?)
    }

    /// Run a catch body with `name` bound to `thrown`, consuming the throw's
    /// reference.
    fn run_catch(
        &mut self,
        name: &str,
        body: &mut Replay,
        thrown: ValueId,
        mode: &mut Mode,
    ) -> Result<(), Interrupt> {
        let frame = self.alloc_held(Value::Object);
        self.heap.add_child(frame, name, thrown);
        self.heap.release(thrown);
        self.push_scope(frame, true);
        let result = self.replay(body, |it| it.block(mode));
        if matches!(result, Err(Interrupt::Error(_))) {
            self.record_scope_dump();
        }
        self.pop_scope();
        result
    }

    /// `switch (expr) { case e: ... break; default: ... break; }`.
    ///
    /// Every clause must end in `break;`; there is no fallthrough. Cases
    /// compare with `==`. Once a clause has run, later case expressions are
    /// not evaluated and `default` does not run.
    fn switch_statement(&mut self, mode: &mut Mode) -> Result<(), Interrupt> {
        self.lexer.match_token(Token::Switch)?;
        self.lexer.match_token(Token::Char('('))?;
        let discriminant = self.base(mode)?;
        self.lexer.match_token(Token::Char(')'))?;
        self.lexer.match_token(Token::Char('{'))?;

        let evaluating = mode.is_evaluating();
        let mut matched = false;
        while self.lexer.token != Token::Char('}') {
            let hit = match self.lexer.token {
                Token::Case => {
                    self.lexer.match_token(Token::Case)?;
                    if evaluating && !matched {
                        let candidate = self.base(mode)?;
                        values_equal(&self.heap, discriminant.value, candidate.value)
                            .map_err(|kind| self.fail(kind))?
                    } else {
                        self.base(&mut Mode::Skip)?;
                        false
                    }
                }
                Token::Default => {
                    self.lexer.match_token(Token::Default)?;
                    evaluating && !matched
                }
                _ => {
                    self.lexer.match_token(Token::Case)?;
                    false
                }
            };
            self.lexer.match_token(Token::Char(':'))?;
            matched |= hit;
            self.switch_clause(mode, hit)?;
        }
        self.lexer.match_token(Token::Char('}'))?;

        if *mode == Mode::Breaking {
            *mode = Mode::Evaluate;
        }
        Ok(())
    }

    fn switch_clause(&mut self, mode: &mut Mode, hit: bool) -> Result<(), Interrupt> {
        let mut skip = Mode::Skip;
        let clause_mode = if hit { &mut *mode } else { &mut skip };
        while !matches!(self.lexer.token, Token::Break | Token::Eof) {
            self.statement(clause_mode)?;
        }
        self.lexer.match_token(Token::Break)?;
        Ok(self.lexer.match_token(Token::Char(';'))?)
    }
}
