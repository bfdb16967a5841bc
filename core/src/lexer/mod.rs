//! Hand-written lexer over a shared source buffer.
//!
//! A [`Lexer`] scans a window `[start, end)` of an `Rc<str>`. Sub-lexers
//! share the same buffer and cover only the text of a previously consumed
//! construct (a loop condition, a loop body, a `try` block), so the
//! interpreter can [`Lexer::reset`] and scan them again on every iteration
//! without copying text.
//!
//! The lexer keeps two characters of lookahead and always holds the
//! current token; [`Lexer::match_token`] checks it and advances.

mod token;

#[cfg(test)]
mod lexer_test;

pub use token::Token;

use alloc::rc::Rc;

use crate::errors::{ErrorKind, ScriptError};
use crate::values::ScriptRegex;
use crate::{String, ToString};

#[derive(Debug, Clone)]
pub struct Lexer {
    source: Rc<str>,
    start: usize,
    end: usize,

    current: char,
    current_pos: usize,
    next: char,
    next_pos: usize,
    read_pos: usize,

    /// The current token.
    pub token: Token,
    /// Identifier name, literal text, unescaped string contents or the full
    /// `/pattern/flags` of a regex.
    pub token_text: String,
    /// Byte offset of the first character of the current token.
    pub token_start: usize,
    /// Byte offset one past the last character of the current token.
    pub token_end: usize,
    /// Byte offset one past the last character of the previous token.
    pub prev_token_end: usize,
}

impl Lexer {
    pub fn new(code: &str) -> Result<Self, ScriptError> {
        Self::over(Rc::from(code))
    }

    /// A lexer over no text, sitting on [`Token::Eof`].
    pub fn empty() -> Self {
        Self {
            source: Rc::from(""),
            start: 0,
            end: 0,
            current: '\0',
            current_pos: 0,
            next: '\0',
            next_pos: 0,
            read_pos: 0,
            token: Token::Eof,
            token_text: String::new(),
            token_start: 0,
            token_end: 0,
            prev_token_end: 0,
        }
    }

    /// Lex the whole of an already shared buffer.
    pub fn over(source: Rc<str>) -> Result<Self, ScriptError> {
        let end = source.len();
        Self::window(source, 0, end)
    }

    fn window(source: Rc<str>, start: usize, end: usize) -> Result<Self, ScriptError> {
        let mut lexer = Self {
            source,
            start,
            end,
            current: '\0',
            current_pos: start,
            next: '\0',
            next_pos: start,
            read_pos: start,
            token: Token::Eof,
            token_text: String::new(),
            token_start: start,
            token_end: start,
            prev_token_end: start,
        };
        lexer.reset()?;
        Ok(lexer)
    }

    /// Rewind to the start of the window and re-prime the lookahead.
    pub fn reset(&mut self) -> Result<(), ScriptError> {
        self.read_pos = self.start;
        self.next_pos = self.start;
        self.current_pos = self.start;
        self.current = '\0';
        self.next = '\0';
        self.token = Token::Eof;
        self.token_text.clear();
        self.token_start = self.start;
        self.token_end = self.start;
        self.prev_token_end = self.start;
        self.advance();
        self.advance();
        self.next_token()
    }

    /// A lexer over `[start, prev_token_end)` of the same buffer, positioned
    /// on its first token.
    pub fn sub_lexer(&self, start: usize) -> Result<Lexer, ScriptError> {
        let end = self.prev_token_end.max(start);
        Self::window(self.source.clone(), start, end)
    }

    /// Source text from `start` up to the end of the previous token.
    pub fn text_since(&self, start: usize) -> &str {
        let end = self.prev_token_end.max(start);
        &self.source[start..end]
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    /// An error located at the current token.
    pub fn error(&self, kind: ErrorKind) -> ScriptError {
        ScriptError::new(kind, self.source.clone(), self.token_start..self.token_end)
    }

    /// Check that the current token is `expected` and move to the next one.
    pub fn match_token(&mut self, expected: Token) -> Result<(), ScriptError> {
        if self.token != expected {
            return Err(self.error(ErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.token.to_string(),
            }));
        }
        self.next_token()
    }

    fn is_eof(&self) -> bool {
        self.current_pos >= self.end
    }

    fn advance(&mut self) {
        self.current = self.next;
        self.current_pos = self.next_pos;
        self.next_pos = self.read_pos;
        match self.source[self.read_pos..self.end].chars().next() {
            Some(c) => {
                self.next = c;
                self.read_pos += c.len_utf8();
            }
            None => self.next = '\0',
        }
    }

    fn take(&mut self) {
        self.token_text.push(self.current);
        self.advance();
    }

    fn skip_trivia(&mut self) {
        loop {
            while !self.is_eof() && self.current.is_whitespace() {
                self.advance();
            }
            if self.is_eof() || self.current != '/' {
                return;
            }
            match self.next {
                '/' => {
                    while !self.is_eof() && self.current != '\n' {
                        self.advance();
                    }
                }
                '*' => {
                    self.advance();
                    self.advance();
                    while !self.is_eof() && !(self.current == '*' && self.next == '/') {
                        self.advance();
                    }
                    self.advance();
                    self.advance();
                }
                _ => return,
            }
        }
    }

    /// Scan the next token into `token`/`token_text`.
    pub fn next_token(&mut self) -> Result<(), ScriptError> {
        let previous = self.token;
        self.prev_token_end = self.token_end;
        self.token_text.clear();
        self.skip_trivia();
        self.token_start = self.current_pos;

        if self.is_eof() {
            self.token = Token::Eof;
            self.token_start = self.end;
            self.token_end = self.end;
            return Ok(());
        }

        let c = self.current;
        if is_ident_start(c) {
            while !self.is_eof() && is_ident_continue(self.current) {
                self.take();
            }
            self.token = Token::keyword(&self.token_text).unwrap_or(Token::Id);
        } else if c.is_ascii_digit() {
            self.lex_number();
        } else if c == '"' || c == '\'' {
            self.lex_string(c);
        } else if c == '/' && !previous.ends_expression() {
            self.token_end = self.current_pos;
            self.lex_regex()?;
        } else {
            self.lex_operator(c);
        }

        self.token_end = self.current_pos.min(self.end);
        Ok(())
    }

    fn lex_number(&mut self) {
        self.token = Token::Int;
        let mut is_hex = false;
        if self.current == '0' {
            self.take();
            if self.current == 'x' || self.current == 'X' {
                is_hex = true;
                self.take();
            }
        }
        while !self.is_eof()
            && (self.current.is_ascii_digit() || (is_hex && self.current.is_ascii_hexdigit()))
        {
            self.take();
        }
        if is_hex {
            return;
        }
        if self.current == '.' && !self.is_eof() {
            self.token = Token::Float;
            self.take();
            while !self.is_eof() && self.current.is_ascii_digit() {
                self.take();
            }
        }
        if (self.current == 'e' || self.current == 'E') && !self.is_eof() {
            self.token = Token::Float;
            self.take();
            if self.current == '-' || self.current == '+' {
                self.take();
            }
            while !self.is_eof() && self.current.is_ascii_digit() {
                self.take();
            }
        }
    }

    fn lex_string(&mut self, quote: char) {
        self.token = Token::Str;
        self.advance();
        while !self.is_eof() && self.current != quote {
            if self.current != '\\' {
                self.take();
                continue;
            }
            self.advance();
            let escaped = match self.current {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'a' => '\x07',
                'b' => '\x08',
                'f' => '\x0c',
                'v' => '\x0b',
                'x' if self.next.is_ascii_hexdigit() => {
                    self.advance();
                    let code = self.read_digits(16, 2);
                    self.token_text.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                    continue;
                }
                '0'..='7' => {
                    let code = self.read_digits(8, 3);
                    self.token_text.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                    continue;
                }
                other => other,
            };
            self.token_text.push(escaped);
            self.advance();
        }
        self.advance();
    }

    /// Read up to `max` digits of `radix`, leaving `current` on the first
    /// character after them.
    fn read_digits(&mut self, radix: u32, max: usize) -> u32 {
        let mut value = 0;
        for _ in 0..max {
            match self.current.to_digit(radix) {
                Some(digit) if !self.is_eof() => {
                    value = value * radix + digit;
                    self.advance();
                }
                _ => break,
            }
        }
        value
    }

    fn lex_regex(&mut self) -> Result<(), ScriptError> {
        self.token = Token::Regex;
        self.take();
        let mut in_class = false;
        loop {
            if self.is_eof() || self.current == '\n' {
                self.token_end = self.current_pos;
                return Err(self.error(ErrorKind::InvalidRegex {
                    literal: self.token_text.clone(),
                    message: "unterminated regular expression literal".into(),
                }));
            }
            match self.current {
                '\\' => {
                    self.take();
                    if !self.is_eof() {
                        self.take();
                    }
                    continue;
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
            self.take();
        }
        self.take();
        while !self.is_eof() && matches!(self.current, 'g' | 'i' | 'm' | 'y') {
            self.take();
        }
        self.token_end = self.current_pos;
        if let Err(kind) = ScriptRegex::parse(&self.token_text) {
            return Err(self.error(kind));
        }
        Ok(())
    }

    fn lex_operator(&mut self, c: char) {
        self.token = Token::Char(c);
        self.take();
        let compound = match (c, self.current) {
            ('=', '=') => Token::Equal,
            ('!', '=') => Token::NotEqual,
            ('<', '=') => Token::LessEqual,
            ('<', '<') => Token::LeftShift,
            ('>', '=') => Token::GreaterEqual,
            ('>', '>') => Token::RightShift,
            ('+', '=') => Token::PlusEqual,
            ('+', '+') => Token::PlusPlus,
            ('-', '=') => Token::MinusEqual,
            ('-', '-') => Token::MinusMinus,
            ('*', '=') => Token::StarEqual,
            ('/', '=') => Token::SlashEqual,
            ('%', '=') => Token::PercentEqual,
            ('&', '=') => Token::AndEqual,
            ('&', '&') => Token::AndAnd,
            ('|', '=') => Token::OrEqual,
            ('|', '|') => Token::OrOr,
            ('^', '=') => Token::XorEqual,
            _ => return,
        };
        self.token = compound;
        self.take();
        if self.is_eof() {
            return;
        }
        let third = match (compound, self.current) {
            (Token::Equal, '=') => Token::TypeEqual,
            (Token::NotEqual, '=') => Token::NotTypeEqual,
            (Token::LeftShift, '=') => Token::LeftShiftEqual,
            (Token::RightShift, '=') => Token::RightShiftEqual,
            (Token::RightShift, '>') => Token::RightShiftUnsigned,
            _ => return,
        };
        self.token = third;
        self.take();
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
