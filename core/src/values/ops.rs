//! Binary operator dispatch over heap values.
//!
//! The operand kinds pick one of four paths:
//!
//! - both numeric (or undefined): integer arithmetic when neither side is a
//!   double, otherwise double arithmetic with tolerant equality;
//! - array or object on the left: identity comparison only;
//! - anything else: the string path, where `+` concatenates.
//!
//! Integer division truncates and integer arithmetic wraps on overflow.

use super::heap::{Heap, ValueId};
use super::value::Value;
use crate::errors::ErrorKind;
use crate::lexer::Token;

/// Doubles closer than this compare equal.
pub const DOUBLE_EPSILON: f64 = 0.00001;

/// Apply `op` to `a` and `b`, producing a fresh value.
pub fn maths_op(heap: &Heap, a: ValueId, b: ValueId, op: Token) -> Result<Value, ErrorKind> {
    let lhs = heap.get(a);
    let rhs = heap.get(b);

    if matches!(op, Token::TypeEqual | Token::NotTypeEqual) {
        let equal = lhs.kind() == rhs.kind() && maths_op(heap, a, b, Token::Equal)?.as_bool();
        return Ok(Value::bool(equal == (op == Token::TypeEqual)));
    }

    if lhs.is_undefined() && rhs.is_undefined() {
        return Ok(match op {
            Token::Equal => Value::bool(true),
            Token::NotEqual => Value::bool(false),
            _ => Value::Undefined,
        });
    }

    let numeric = |v: &Value| v.is_numeric() || v.is_undefined();
    if numeric(lhs) && numeric(rhs) {
        if lhs.is_double() || rhs.is_double() {
            return double_op(lhs.as_double(), rhs.as_double(), op);
        }
        return int_op(lhs.as_int(), rhs.as_int(), op);
    }

    if lhs.is_array() || lhs.is_object() {
        let datatype = if lhs.is_array() { "Array" } else { "Object" };
        return match op {
            Token::Equal => Ok(Value::bool(a == b)),
            Token::NotEqual => Ok(Value::bool(a != b)),
            _ => Err(ErrorKind::UnsupportedOperation { datatype }),
        };
    }

    string_op(&lhs.to_display_string(), &rhs.to_display_string(), op)
}

/// Loose (`==`) equality of two values.
pub fn values_equal(heap: &Heap, a: ValueId, b: ValueId) -> Result<bool, ErrorKind> {
    Ok(maths_op(heap, a, b, Token::Equal)?.as_bool())
}

fn int_op(a: i32, b: i32, op: Token) -> Result<Value, ErrorKind> {
    let value = match op {
        Token::Char('+') => Value::Int(a.wrapping_add(b)),
        Token::Char('-') => Value::Int(a.wrapping_sub(b)),
        Token::Char('*') => Value::Int(a.wrapping_mul(b)),
        Token::Char('/') if b == 0 => return Err(ErrorKind::DivisionByZero),
        Token::Char('/') => Value::Int(a.wrapping_div(b)),
        Token::Char('%') if b == 0 => return Err(ErrorKind::DivisionByZero),
        Token::Char('%') => Value::Int(a.wrapping_rem(b)),
        Token::Char('&') => Value::Int(a & b),
        Token::Char('|') => Value::Int(a | b),
        Token::Char('^') => Value::Int(a ^ b),
        Token::Equal => Value::bool(a == b),
        Token::NotEqual => Value::bool(a != b),
        Token::Char('<') => Value::bool(a < b),
        Token::LessEqual => Value::bool(a <= b),
        Token::Char('>') => Value::bool(a > b),
        Token::GreaterEqual => Value::bool(a >= b),
        _ => return Err(ErrorKind::UnsupportedOperation { datatype: "Int" }),
    };
    Ok(value)
}

fn double_op(a: f64, b: f64, op: Token) -> Result<Value, ErrorKind> {
    let equal = (a - b).abs() < DOUBLE_EPSILON;
    let value = match op {
        Token::Char('+') => Value::Double(a + b),
        Token::Char('-') => Value::Double(a - b),
        Token::Char('*') => Value::Double(a * b),
        Token::Char('/') => Value::Double(a / b),
        Token::Equal => Value::bool(equal),
        Token::NotEqual => Value::bool(!equal),
        Token::Char('<') => Value::bool(a < b),
        Token::LessEqual => Value::bool(a <= b),
        Token::Char('>') => Value::bool(a > b),
        Token::GreaterEqual => Value::bool(a >= b),
        _ => return Err(ErrorKind::UnsupportedOperation { datatype: "Double" }),
    };
    Ok(value)
}

fn string_op(a: &str, b: &str, op: Token) -> Result<Value, ErrorKind> {
    let value = match op {
        Token::Char('+') => {
            let mut joined = ecow::EcoString::from(a);
            joined.push_str(b);
            Value::Str(joined)
        }
        Token::Equal => Value::bool(a == b),
        Token::NotEqual => Value::bool(a != b),
        Token::Char('<') => Value::bool(a < b),
        Token::LessEqual => Value::bool(a <= b),
        Token::Char('>') => Value::bool(a > b),
        Token::GreaterEqual => Value::bool(a >= b),
        _ => return Err(ErrorKind::UnsupportedOperation { datatype: "String" }),
    };
    Ok(value)
}
