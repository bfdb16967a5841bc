//! The dynamic value payload carried by every heap node.

use core::fmt;

use ecow::EcoString;
use regex::{Regex, RegexBuilder};

use super::function::{FunctionBody, NativeFunction};
use crate::errors::ErrorKind;
use crate::{String, ToString, format};

/// Payload of a heap node.
///
/// Children (properties, array slots, formal parameters) live next to the
/// payload in the heap, so an `Object` or `Array` here is only the tag.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Int(i32),
    Double(f64),
    Str(EcoString),
    Regexp(ScriptRegex),
    Object,
    Array,
    Function(FunctionBody),
}

/// Type tag of a [`Value`], ignoring whether a function is native.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Int,
    Double,
    String,
    Regexp,
    Object,
    Array,
    Function,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "Undefined",
            Kind::Null => "Null",
            Kind::Int => "Int",
            Kind::Double => "Double",
            Kind::String => "String",
            Kind::Regexp => "Regexp",
            Kind::Object => "Object",
            Kind::Array => "Array",
            Kind::Function => "Function",
        }
    }
}

impl Value {
    pub fn bool(value: bool) -> Value {
        Value::Int(value as i32)
    }

    pub fn string(text: impl Into<EcoString>) -> Value {
        Value::Str(text.into())
    }

    pub fn script_function(body: impl Into<EcoString>) -> Value {
        Value::Function(FunctionBody::Script(body.into()))
    }

    pub fn native(function: NativeFunction) -> Value {
        Value::Function(FunctionBody::Native(function))
    }

    /// Build a value from literal text, interpreted according to `kind`.
    ///
    /// Integers accept `0x` hex, leading-zero octal and decimal; decimal
    /// literals too large for 32 bits become doubles. Regexps take the full
    /// `/pattern/flags` form.
    pub fn from_raw(text: &str, kind: Kind) -> Result<Value, ErrorKind> {
        let invalid = || ErrorKind::InvalidNumber {
            text: text.to_string(),
        };
        match kind {
            Kind::Int => {
                if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
                    return Ok(Value::Int(value as i32));
                }
                if text.len() > 1
                    && text.starts_with('0')
                    && text.bytes().all(|b| (b'0'..=b'7').contains(&b))
                {
                    let value = u32::from_str_radix(&text[1..], 8).map_err(|_| invalid())?;
                    return Ok(Value::Int(value as i32));
                }
                let wide: i64 = text.parse().map_err(|_| invalid())?;
                Ok(match i32::try_from(wide) {
                    Ok(value) => Value::Int(value),
                    Err(_) => Value::Double(wide as f64),
                })
            }
            Kind::Double => text.parse().map(Value::Double).map_err(|_| invalid()),
            Kind::Regexp => ScriptRegex::parse(text).map(Value::Regexp),
            Kind::String => Ok(Value::string(text)),
            Kind::Null => Ok(Value::Null),
            Kind::Object => Ok(Value::Object),
            Kind::Array => Ok(Value::Array),
            Kind::Function => Ok(Value::script_function(text)),
            Kind::Undefined => Ok(Value::Undefined),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
            Value::Str(_) => Kind::String,
            Value::Regexp(_) => Kind::Regexp,
            Value::Object => Kind::Object,
            Value::Array => Kind::Array,
            Value::Function(_) => Kind::Function,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_regexp(&self) -> bool {
        matches!(self, Value::Regexp(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Value::Function(FunctionBody::Native(_)))
    }

    /// Integer view: doubles truncate, everything non-numeric reads as 0.
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(i) => *i,
            Value::Double(d) => *d as i32,
            _ => 0,
        }
    }

    pub fn as_double(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Double(d) => *d,
            _ => 0.0,
        }
    }

    /// Truthiness is the integer view being non-zero.
    pub fn as_bool(&self) -> bool {
        self.as_int() != 0
    }

    /// String view used by concatenation, comparison and property keys.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Double(d) => format_double(*d),
            Value::Null => "null".into(),
            Value::Undefined => "undefined".into(),
            Value::Str(s) => s.to_string(),
            Value::Regexp(re) => re.literal(),
            Value::Function(FunctionBody::Script(body)) => body.to_string(),
            Value::Function(FunctionBody::Native(_)) | Value::Object | Value::Array => {
                String::new()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value == f64::INFINITY {
        "Infinity".into()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".into()
    } else {
        format!("{}", value)
    }
}

/// A compiled regex literal.
///
/// Only the `i` and `m` flags change matching; `g` and `y` are kept for
/// display.
#[derive(Debug, Clone)]
pub struct ScriptRegex {
    pattern: EcoString,
    flags: EcoString,
    compiled: Regex,
}

impl ScriptRegex {
    pub fn new(pattern: &str, flags: &str) -> Result<Self, ErrorKind> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .build()
            .map_err(|err| ErrorKind::InvalidRegex {
                literal: format!("/{}/{}", pattern, flags),
                message: err.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.into(),
            flags: flags.into(),
            compiled,
        })
    }

    /// Parse a `/pattern/flags` literal.
    pub fn parse(literal: &str) -> Result<Self, ErrorKind> {
        let malformed = || ErrorKind::InvalidRegex {
            literal: literal.to_string(),
            message: "expected /pattern/flags".into(),
        };
        let body = literal.strip_prefix('/').ok_or_else(malformed)?;
        let close = body.rfind('/').ok_or_else(malformed)?;
        Self::new(&body[..close], &body[close + 1..])
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn regex(&self) -> &Regex {
        &self.compiled
    }

    pub fn literal(&self) -> String {
        format!("/{}/{}", self.pattern, self.flags)
    }
}
