//! Global Functions
//!
//! Root-level helpers plus the `console`, `Integer`, `JSON` and `Object`
//! namespaces.

use crate::api::{Engine, Error, NativeCall, NativeResult};
use crate::values::Value;

// ============================================================================
// Number Parsing
// ============================================================================

/// Leading integer of `text`, C `strtol` style: optional sign, then a `0x`
/// prefix for hex, a leading `0` for octal, decimal otherwise. Parsing stops
/// at the first digit that does not fit the radix; no digits give 0.
pub fn parse_int_prefix(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(rest) => (16, rest),
        None if text.starts_with('0') => (8, text),
        None => (10, text),
    };

    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = (value * i64::from(radix) + i64::from(digit)).min(i64::from(u32::MAX));
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Longest leading slice of `text` that reads as a number; 0 when there is
/// none.
pub fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    text.char_indices()
        .map(|(at, c)| at + c.len_utf8())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Code of the first character of `ch`, 0 for an empty string.
fn first_char_code(call: &mut NativeCall<'_>, name: &str) -> NativeResult {
    let text = call.arg_string(name);
    let code = text.chars().next().map_or(0, |c| c as i32);
    call.set_return(Value::Int(code));
    Ok(())
}

fn parse_int(call: &mut NativeCall<'_>) -> NativeResult {
    let value = parse_int_prefix(&call.arg_string("str"));
    call.set_return(Value::Int(value));
    Ok(())
}

fn parse_float(call: &mut NativeCall<'_>) -> NativeResult {
    let value = parse_float_prefix(&call.arg_string("str"));
    call.set_return(Value::Double(value));
    Ok(())
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate `jsCode` against Root and return the last value.
fn eval(call: &mut NativeCall<'_>) -> NativeResult {
    let code = call.arg_string("jsCode");
    let result = call.eval_complex(&code)?;
    call.set_return_id(result);
    Ok(())
}

fn exec(call: &mut NativeCall<'_>) -> NativeResult {
    let code = call.arg_string("jsCode");
    call.execute(&code)
}

fn trace(call: &mut NativeCall<'_>) -> NativeResult {
    let dump = call.trace(call.root(), "root");
    tracing::info!("{}", dump);
    Ok(())
}

// ============================================================================
// Console
// ============================================================================

fn console_log(call: &mut NativeCall<'_>) -> NativeResult {
    let text = call.arg_string("text");
    call.console().log(&text);
    Ok(())
}

fn console_error(call: &mut NativeCall<'_>) -> NativeResult {
    let text = call.arg_string("text");
    call.console().error(&text);
    Ok(())
}

fn console_clear(call: &mut NativeCall<'_>) -> NativeResult {
    call.console().clear();
    Ok(())
}

// ============================================================================
// JSON
// ============================================================================

/// Parse by evaluating the text as an expression.
fn json_parse(call: &mut NativeCall<'_>) -> NativeResult {
    let text = call.arg_string("text");
    let result = call.eval_complex(&text)?;
    call.set_return_id(result);
    Ok(())
}

/// JSON emission of `obj`. `replacer` is accepted and ignored.
fn json_stringify(call: &mut NativeCall<'_>) -> NativeResult {
    let json = match call.arg("obj") {
        Some(obj) => call.to_json(obj),
        None => "undefined".into(),
    };
    call.set_return(Value::string(json));
    Ok(())
}

// ============================================================================
// Object
// ============================================================================

fn object_dump(call: &mut NativeCall<'_>) -> NativeResult {
    if let Some(this) = call.this() {
        let dump = call.trace(this, "this");
        tracing::info!("{}", dump);
    }
    Ok(())
}

/// Structural copy of `this`; `prototype` links stay shared.
fn object_clone(call: &mut NativeCall<'_>) -> NativeResult {
    let Some(this) = call.this() else {
        call.set_return(Value::Undefined);
        return Ok(());
    };
    let copy = call.heap_mut().alloc(Value::Undefined);
    call.set_return_id(copy);
    call.heap_mut().copy_value(copy, this);
    Ok(())
}

// ============================================================================
// Registration
// ============================================================================

/// Register Root functions and the `console`, `Integer`, `JSON` and
/// `Object` namespaces.
pub fn register_global(engine: &mut Engine) -> Result<(), Error> {
    engine.add_native("function eval(jsCode)", eval)?;
    engine.add_native("function exec(jsCode)", exec)?;
    engine.add_native("function trace()", trace)?;
    engine.add_native("function charToInt(ch)", |call| first_char_code(call, "ch"))?;
    engine.add_native("function parseInt(str)", parse_int)?;
    engine.add_native("function parseFloat(str)", parse_float)?;

    engine.add_native("function console.log(text)", console_log)?;
    engine.add_native("function console.error(text)", console_error)?;
    engine.add_native("function console.clear()", console_clear)?;

    engine.add_native("function Integer.parseInt(str)", parse_int)?;
    engine.add_native("function Integer.parseFloat(str)", parse_float)?;
    engine.add_native("function Integer.valueOf(str)", |call| first_char_code(call, "str"))?;

    engine.add_native("function JSON.parse(text)", json_parse)?;
    engine.add_native("function JSON.stringify(obj, replacer)", json_stringify)?;

    engine.add_native("function Object.dump()", object_dump)?;
    engine.add_native("function Object.clone()", object_clone)?;
    Ok(())
}
