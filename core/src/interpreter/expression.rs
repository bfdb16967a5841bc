//! Operator productions, from assignment down to unary operators.
//!
//! Each level parses its operands through the next one down and combines
//! them with [`Interpreter::maths`]. Results of arithmetic are always fresh
//! detached values; only assignment and `++`/`--` write through a link.

use super::stack::ensure_sufficient_stack;
use super::{Interpreter, Interrupt, Link, Mode, Slot};
use crate::lexer::Token;
use crate::values::Value;

impl Interpreter {
    /// A full expression. Nested expressions and calls re-enter here.
    pub(crate) fn base(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        ensure_sufficient_stack(|| self.assignment(mode))
    }

    /// Assignment: `lhs (= | += | -= | *= | /= | %=) base`, right-associative.
    ///
    /// A detached but named left-hand side (an undeclared identifier) is
    /// first created on Root, so plain assignment declares globals.
    fn assignment(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let mut lhs = self.ternary(mode)?;
        let op = self.lexer.token;
        let arithmetic = match op {
            Token::Char('=') => None,
            Token::PlusEqual => Some(Token::Char('+')),
            Token::MinusEqual => Some(Token::Char('-')),
            Token::StarEqual => Some(Token::Char('*')),
            Token::SlashEqual => Some(Token::Char('/')),
            Token::PercentEqual => Some(Token::Char('%')),
            _ => return Ok(lhs),
        };

        if mode.is_evaluating() && !lhs.is_attached() {
            if lhs.name.is_empty() {
                tracing::warn!("assignment to an unnamed value has no effect");
            } else {
                let id = self.heap.add_child_no_dup(self.root, &lhs.name, lhs.value);
                lhs.slot = Slot::Child {
                    parent: self.root,
                    link: id,
                };
            }
        }

        self.lexer.match_token(op)?;
        let rhs = self.base(mode)?;

        if mode.is_evaluating() {
            if lhs.read_only {
                return Err(self.const_violation(&lhs.name));
            }
            let value = match arithmetic {
                None => rhs.value,
                Some(op) => self.maths(&lhs, &rhs, op)?.value,
            };
            self.replace_link(&mut lhs, value);
        }
        Ok(lhs)
    }

    /// `condition ? base : base`. Only the chosen branch is evaluated.
    fn ternary(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let condition = self.logic(mode)?;
        if self.lexer.token != Token::Char('?') {
            return Ok(condition);
        }
        self.lexer.match_token(Token::Char('?'))?;

        let evaluating = mode.is_evaluating();
        let taken = evaluating && self.truthy(&condition);
        let when_true = self.base_in(mode, taken)?;
        self.lexer.match_token(Token::Char(':'))?;
        let when_false = self.base_in(mode, evaluating && !taken)?;

        Ok(match (evaluating, taken) {
            (false, _) => condition,
            (true, true) => when_true,
            (true, false) => when_false,
        })
    }

    fn base_in(&mut self, mode: &mut Mode, taken: bool) -> Result<Link, Interrupt> {
        if taken {
            self.base(mode)
        } else {
            self.base(&mut Mode::Skip)
        }
    }

    /// `& | ^ && ||`, left-associative.
    ///
    /// `&&` and `||` coerce both sides to 0/1. When the left side decides
    /// the result, the right side is only parsed and the left operand is
    /// the result.
    fn logic(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let mut lhs = self.condition(mode)?;
        loop {
            let op = self.lexer.token;
            if !matches!(
                op,
                Token::Char('&') | Token::Char('|') | Token::Char('^') | Token::AndAnd | Token::OrOr
            ) {
                return Ok(lhs);
            }
            self.lexer.match_token(op)?;

            let shortcut = mode.is_evaluating()
                && match op {
                    Token::AndAnd => !self.truthy(&lhs),
                    Token::OrOr => self.truthy(&lhs),
                    _ => false,
                };
            if shortcut {
                self.condition(&mut Mode::Skip)?;
                continue;
            }

            let rhs = self.condition(mode)?;
            if mode.is_evaluating() {
                lhs = match op {
                    Token::AndAnd => {
                        let value = self.truthy(&lhs) & self.truthy(&rhs);
                        self.detached(Value::bool(value))
                    }
                    Token::OrOr => {
                        let value = self.truthy(&lhs) | self.truthy(&rhs);
                        self.detached(Value::bool(value))
                    }
                    _ => self.maths(&lhs, &rhs, op)?,
                };
            }
        }
    }

    /// Equality and relational operators, left-associative.
    fn condition(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let mut lhs = self.shift(mode)?;
        while matches!(
            self.lexer.token,
            Token::Equal
                | Token::NotEqual
                | Token::TypeEqual
                | Token::NotTypeEqual
                | Token::LessEqual
                | Token::GreaterEqual
                | Token::Char('<')
                | Token::Char('>')
        ) {
            let op = self.lexer.token;
            self.lexer.match_token(op)?;
            let rhs = self.shift(mode)?;
            if mode.is_evaluating() {
                lhs = self.maths(&lhs, &rhs, op)?;
            }
        }
        Ok(lhs)
    }

    /// `<< >> >>>` on 32-bit integers. The shift count is taken modulo 32.
    fn shift(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let mut lhs = self.expression(mode)?;
        while matches!(
            self.lexer.token,
            Token::LeftShift | Token::RightShift | Token::RightShiftUnsigned
        ) {
            let op = self.lexer.token;
            self.lexer.match_token(op)?;
            let rhs = self.expression(mode)?;
            if mode.is_evaluating() {
                let value = self.heap.get(lhs.value).as_int();
                let count = self.heap.get(rhs.value).as_int() as u32;
                let shifted = match op {
                    Token::LeftShift => value.wrapping_shl(count),
                    Token::RightShift => value.wrapping_shr(count),
                    _ => (value as u32).wrapping_shr(count) as i32,
                };
                lhs = self.detached(Value::Int(shifted));
            }
        }
        Ok(lhs)
    }

    /// Additive operators, unary minus and `++`/`--`.
    ///
    /// `++` and `--` yield the value from before the update wherever the
    /// operator appears, so `--x` behaves like `x--`.
    fn expression(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let prefix = match self.lexer.token {
            op @ (Token::Char('-') | Token::PlusPlus | Token::MinusMinus) => {
                self.lexer.match_token(op)?;
                Some(op)
            }
            _ => None,
        };

        let mut lhs = self.term(mode)?;
        match prefix {
            Some(Token::Char('-')) if mode.is_evaluating() => {
                let zero = self.detached(Value::Int(0));
                lhs = self.maths(&zero, &lhs, Token::Char('-'))?;
            }
            Some(op @ (Token::PlusPlus | Token::MinusMinus)) if mode.is_evaluating() => {
                lhs = self.step(lhs, op)?;
            }
            _ => {}
        }

        loop {
            let op = self.lexer.token;
            match op {
                Token::PlusPlus | Token::MinusMinus => {
                    self.lexer.match_token(op)?;
                    if mode.is_evaluating() {
                        lhs = self.step(lhs, op)?;
                    }
                }
                Token::Char('+') | Token::Char('-') => {
                    self.lexer.match_token(op)?;
                    let rhs = self.term(mode)?;
                    if mode.is_evaluating() {
                        lhs = self.maths(&lhs, &rhs, op)?;
                    }
                }
                _ => return Ok(lhs),
            }
        }
    }

    /// Add or subtract one through `target`, returning the old value.
    fn step(&mut self, mut target: Link, op: Token) -> Result<Link, Interrupt> {
        if target.read_only {
            return Err(self.const_violation(&target.name));
        }
        let one = self.detached(Value::Int(1));
        let arithmetic = if op == Token::PlusPlus {
            Token::Char('+')
        } else {
            Token::Char('-')
        };
        let updated = self.maths(&target, &one, arithmetic)?;
        let old = target.value;
        self.replace_link(&mut target, updated.value);
        Ok(Link::detached(old))
    }

    /// `* / %`, left-associative.
    fn term(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        let mut lhs = self.unary(mode)?;
        while matches!(
            self.lexer.token,
            Token::Char('*') | Token::Char('/') | Token::Char('%')
        ) {
            let op = self.lexer.token;
            self.lexer.match_token(op)?;
            let rhs = self.unary(mode)?;
            if mode.is_evaluating() {
                lhs = self.maths(&lhs, &rhs, op)?;
            }
        }
        Ok(lhs)
    }

    /// `!operand` and `typeof operand`.
    fn unary(&mut self, mode: &mut Mode) -> Result<Link, Interrupt> {
        match self.lexer.token {
            Token::Char('!') => {
                self.lexer.match_token(Token::Char('!'))?;
                let operand = self.unary(mode)?;
                if !mode.is_evaluating() {
                    return Ok(operand);
                }
                let negated = !self.truthy(&operand);
                Ok(self.detached(Value::bool(negated)))
            }
            Token::TypeOf => {
                self.lexer.match_token(Token::TypeOf)?;
                let operand = self.unary(mode)?;
                if !mode.is_evaluating() {
                    return Ok(operand);
                }
                let name = type_name(self.heap.get(operand.value));
                Ok(self.detached(Value::string(name)))
            }
            _ => self.factor(mode),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Int(_) | Value::Double(_) => "number",
        Value::Str(_) => "string",
        Value::Function(_) => "function",
        Value::Null | Value::Regexp(_) | Value::Object | Value::Array => "object",
    }
}
