//! Token kinds produced by the lexer.

use core::fmt;

/// The closed set of token kinds.
///
/// Single characters that are not part of a multi-character operator pass
/// through as [`Token::Char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Eof,
    Id,
    Int,
    Float,
    Str,
    Regex,

    // Multi-character operators
    Equal,
    TypeEqual,
    NotEqual,
    NotTypeEqual,
    LessEqual,
    LeftShift,
    LeftShiftEqual,
    GreaterEqual,
    RightShift,
    RightShiftUnsigned,
    RightShiftEqual,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    PlusPlus,
    MinusMinus,
    AndEqual,
    AndAnd,
    OrEqual,
    OrOr,
    XorEqual,

    // Reserved words
    If,
    Else,
    Do,
    While,
    For,
    Break,
    Continue,
    Function,
    Return,
    Var,
    Const,
    True,
    False,
    Null,
    Undefined,
    New,
    TypeOf,
    Try,
    Catch,
    Finally,
    Throw,
    Switch,
    Case,
    Default,

    Char(char),
}

impl Token {
    /// Map an identifier to its reserved word, if it is one.
    pub fn keyword(ident: &str) -> Option<Token> {
        let token = match ident {
            "if" => Token::If,
            "else" => Token::Else,
            "do" => Token::Do,
            "while" => Token::While,
            "for" => Token::For,
            "break" => Token::Break,
            "continue" => Token::Continue,
            "function" => Token::Function,
            "return" => Token::Return,
            "var" => Token::Var,
            "const" => Token::Const,
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            "undefined" => Token::Undefined,
            "new" => Token::New,
            "typeof" => Token::TypeOf,
            "try" => Token::Try,
            "catch" => Token::Catch,
            "finally" => Token::Finally,
            "throw" => Token::Throw,
            "switch" => Token::Switch,
            "case" => Token::Case,
            "default" => Token::Default,
            _ => return None,
        };
        Some(token)
    }

    /// Whether a `/` following this token continues an expression (division)
    /// rather than opening a regex literal.
    pub(crate) fn ends_expression(self) -> bool {
        matches!(
            self,
            Token::Id
                | Token::Int
                | Token::Float
                | Token::Str
                | Token::Regex
                | Token::True
                | Token::False
                | Token::Null
                | Token::Undefined
                | Token::PlusPlus
                | Token::MinusMinus
                | Token::Eof
                | Token::Char(']' | ')' | '.')
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Char(c) => return write!(f, "'{}'", c),
            Token::Eof => "EOF",
            Token::Id => "ID",
            Token::Int => "INT",
            Token::Float => "FLOAT",
            Token::Str => "STRING",
            Token::Regex => "REGEX",
            Token::Equal => "==",
            Token::TypeEqual => "===",
            Token::NotEqual => "!=",
            Token::NotTypeEqual => "!==",
            Token::LessEqual => "<=",
            Token::LeftShift => "<<",
            Token::LeftShiftEqual => "<<=",
            Token::GreaterEqual => ">=",
            Token::RightShift => ">>",
            Token::RightShiftUnsigned => ">>>",
            Token::RightShiftEqual => ">>=",
            Token::PlusEqual => "+=",
            Token::MinusEqual => "-=",
            Token::StarEqual => "*=",
            Token::SlashEqual => "/=",
            Token::PercentEqual => "%=",
            Token::PlusPlus => "++",
            Token::MinusMinus => "--",
            Token::AndEqual => "&=",
            Token::AndAnd => "&&",
            Token::OrEqual => "|=",
            Token::OrOr => "||",
            Token::XorEqual => "^=",
            Token::If => "if",
            Token::Else => "else",
            Token::Do => "do",
            Token::While => "while",
            Token::For => "for",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Function => "function",
            Token::Return => "return",
            Token::Var => "var",
            Token::Const => "const",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Undefined => "undefined",
            Token::New => "new",
            Token::TypeOf => "typeof",
            Token::Try => "try",
            Token::Catch => "catch",
            Token::Finally => "finally",
            Token::Throw => "throw",
            Token::Switch => "switch",
            Token::Case => "case",
            Token::Default => "default",
        };
        f.write_str(text)
    }
}
