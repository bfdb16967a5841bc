use super::{Lexer, Token};
use crate::errors::ErrorKind;
use crate::{String, Vec};

fn tokens(code: &str) -> Vec<(Token, String)> {
    let mut lexer = Lexer::new(code).unwrap();
    let mut out = Vec::new();
    while lexer.token != Token::Eof {
        out.push((lexer.token, lexer.token_text.clone()));
        lexer.next_token().unwrap();
    }
    out
}

fn kinds(code: &str) -> Vec<Token> {
    tokens(code).into_iter().map(|(t, _)| t).collect()
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        kinds("var $x = _y; function typeof"),
        vec![
            Token::Var,
            Token::Id,
            Token::Char('='),
            Token::Id,
            Token::Char(';'),
            Token::Function,
            Token::TypeOf,
        ]
    );
}

#[test]
fn test_multi_character_operators() {
    assert_eq!(
        // `/=` needs an operand in front, or it opens a regex.
        kinds("== === != !== <= >= << >> >>> && || ++ -- += -= *= x /= %= <<= >>="),
        vec![
            Token::Equal,
            Token::TypeEqual,
            Token::NotEqual,
            Token::NotTypeEqual,
            Token::LessEqual,
            Token::GreaterEqual,
            Token::LeftShift,
            Token::RightShift,
            Token::RightShiftUnsigned,
            Token::AndAnd,
            Token::OrOr,
            Token::PlusPlus,
            Token::MinusMinus,
            Token::PlusEqual,
            Token::MinusEqual,
            Token::StarEqual,
            Token::Id,
            Token::SlashEqual,
            Token::PercentEqual,
            Token::LeftShiftEqual,
            Token::RightShiftEqual,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("42 0x1F 007 3.25 1e-5 2E3"),
        vec![
            (Token::Int, "42".into()),
            (Token::Int, "0x1F".into()),
            (Token::Int, "007".into()),
            (Token::Float, "3.25".into()),
            (Token::Float, "1e-5".into()),
            (Token::Float, "2E3".into()),
        ]
    );
}

#[test]
fn test_string_escapes() {
    let toks = tokens(r#""a\nb\"c" 'd\te\'f' "\x41\101\q""#);
    assert_eq!(toks[0], (Token::Str, "a\nb\"c".into()));
    assert_eq!(toks[1], (Token::Str, "d\te'f".into()));
    assert_eq!(toks[2], (Token::Str, "AAq".into()));
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("a // line comment\n /* block\n comment */ b"),
        vec![Token::Id, Token::Id]
    );
}

#[test]
fn test_regex_versus_division() {
    let toks = tokens("x = a / b; r = /ab+c/i;");
    assert_eq!(toks[3].0, Token::Char('/'));
    assert_eq!(toks[8], (Token::Regex, "/ab+c/i".into()));
}

#[test]
fn test_slash_after_operand_or_operator() {
    assert_eq!(
        kinds("(a) / 2; f(/x/); typeof /y/; n /= 2; n = /=/;"),
        vec![
            Token::Char('('),
            Token::Id,
            Token::Char(')'),
            Token::Char('/'),
            Token::Int,
            Token::Char(';'),
            Token::Id,
            Token::Char('('),
            Token::Regex,
            Token::Char(')'),
            Token::Char(';'),
            Token::TypeOf,
            Token::Regex,
            Token::Char(';'),
            Token::Id,
            Token::SlashEqual,
            Token::Int,
            Token::Char(';'),
            Token::Id,
            Token::Char('='),
            Token::Regex,
            Token::Char(';'),
        ]
    );
}

#[test]
fn test_regex_with_slash_in_class() {
    let toks = tokens("r = /[/]x\\/y/g;");
    assert_eq!(toks[2], (Token::Regex, "/[/]x\\/y/g".into()));
}

#[test]
fn test_invalid_regex_is_a_lex_error() {
    let err = Lexer::new("r = /a(b/;")
        .and_then(|mut l| {
            while l.token != Token::Eof {
                l.next_token()?;
            }
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidRegex { .. }));
}

#[test]
fn test_match_token_reports_expected_and_found() {
    let mut lexer = Lexer::new("foo bar").unwrap();
    lexer.match_token(Token::Id).unwrap();
    let err = lexer.match_token(Token::Char(';')).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ERROR on line 1 column 5 [Unexpected token type. Expected ';', found ID]"
    );
}

#[test]
fn test_sub_lexer_replays_consumed_span() {
    let mut lexer = Lexer::new("while (i < 10) x;").unwrap();
    lexer.match_token(Token::While).unwrap();
    lexer.match_token(Token::Char('(')).unwrap();
    let start = lexer.token_start;
    lexer.match_token(Token::Id).unwrap();
    lexer.match_token(Token::Char('<')).unwrap();
    lexer.match_token(Token::Int).unwrap();
    assert_eq!(lexer.token, Token::Char(')'));

    let mut condition = lexer.sub_lexer(start).unwrap();
    assert_eq!(lexer.text_since(start), "i < 10");
    let mut seen = Vec::new();
    for _ in 0..2 {
        condition.reset().unwrap();
        while condition.token != Token::Eof {
            seen.push(condition.token);
            condition.next_token().unwrap();
        }
    }
    assert_eq!(
        seen,
        vec![
            Token::Id,
            Token::Char('<'),
            Token::Int,
            Token::Id,
            Token::Char('<'),
            Token::Int
        ]
    );
}

#[test]
fn test_line_and_column_tracking() {
    let mut lexer = Lexer::new("a;\n  b").unwrap();
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    let err = lexer.match_token(Token::Char(';')).unwrap_err();
    assert_eq!((err.line, err.column), (2, 3));
}
