//! String Package
//!
//! Methods on the `String` class, reached through member lookup on any
//! string value, so `this` is the receiver.
//!
//! Positions count characters, not bytes.

use crate::api::{Engine, Error, NativeCall, NativeResult};
use crate::values::{ScriptRegex, Value};
use crate::{String, ToString};

/// The receiver as text; empty when called without one.
fn this_string(call: &NativeCall<'_>) -> String {
    call.this()
        .map(|id| call.heap().get(id).to_display_string())
        .unwrap_or_default()
}

/// Clamp a script index into `0..=len`.
fn clamp(index: i32, len: usize) -> usize {
    (index.max(0) as usize).min(len)
}

// ============================================================================
// Inspection Functions
// ============================================================================

/// Character position of the first occurrence of `search`, or -1.
fn string_index_of(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let search = call.arg_string("search");
    let position = match text.find(search.as_str()) {
        Some(byte) => text[..byte].chars().count() as i32,
        None => -1,
    };
    call.set_return(Value::Int(position));
    Ok(())
}

fn string_char_at(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let pos = call.arg_int("pos");
    let found = usize::try_from(pos).ok().and_then(|pos| text.chars().nth(pos));
    let result = found.map(String::from).unwrap_or_default();
    call.set_return(Value::string(result));
    Ok(())
}

/// Code point at `pos`, 0 when out of range.
fn string_char_code_at(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let pos = call.arg_int("pos");
    let found = usize::try_from(pos).ok().and_then(|pos| text.chars().nth(pos));
    call.set_return(Value::Int(found.map_or(0, |c| c as i32)));
    Ok(())
}

fn string_from_char_code(call: &mut NativeCall<'_>) -> NativeResult {
    let code = call.arg_int("char");
    let text = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_default();
    call.set_return(Value::string(text));
    Ok(())
}

// ============================================================================
// Slicing Functions
// ============================================================================

/// Characters in `[lo, hi)`. Bounds are clamped and swapped when reversed.
fn string_substring(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let len = text.chars().count();
    let lo = clamp(call.arg_int("lo"), len);
    let hi = match call.arg_value("hi") {
        Some(value) if !value.is_undefined() => clamp(value.as_int(), len),
        _ => len,
    };
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let result: String = text.chars().skip(lo).take(hi - lo).collect();
    call.set_return(Value::string(result));
    Ok(())
}

/// Split on `separator` into a new array. An empty separator splits into
/// characters.
fn string_split(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let separator = call.arg_string("separator");
    let pieces: crate::Vec<String> = if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator.as_str()).map(ToString::to_string).collect()
    };

    let array = call.heap_mut().alloc(Value::Array);
    call.set_return_id(array);
    for piece in pieces {
        let heap = call.heap_mut();
        let item = heap.alloc(Value::string(piece));
        heap.array_push(array, item);
    }
    Ok(())
}

// ============================================================================
// Regular Expressions
// ============================================================================

/// `[whole, group1, ...]` for the first match of `regex`, or null.
///
/// A string argument is compiled as a pattern without flags. Groups that
/// did not take part in the match are undefined.
fn string_match(call: &mut NativeCall<'_>) -> NativeResult {
    let text = this_string(call);
    let regex = match call.arg_value("regex") {
        Some(Value::Regexp(regex)) => regex.clone(),
        Some(Value::Str(pattern)) => {
            let pattern = pattern.clone();
            ScriptRegex::new(&pattern, "").map_err(|kind| call.error(kind.to_string()))?
        }
        _ => return Err(call.error("String.match expects a regular expression")),
    };

    let Some(captures) = regex.regex().captures(&text) else {
        call.set_return(Value::Null);
        return Ok(());
    };
    let groups: crate::Vec<Option<String>> = captures
        .iter()
        .map(|group| group.map(|found| found.as_str().to_string()))
        .collect();

    let array = call.heap_mut().alloc(Value::Array);
    call.set_return_id(array);
    for group in groups {
        let heap = call.heap_mut();
        let item = heap.alloc(group.map_or(Value::Undefined, Value::string));
        heap.array_push(array, item);
    }
    Ok(())
}

// ============================================================================
// Registration
// ============================================================================

/// Register the methods of the `String` class.
pub fn register_string(engine: &mut Engine) -> Result<(), Error> {
    engine.add_native("function String.indexOf(search)", string_index_of)?;
    engine.add_native("function String.substring(lo, hi)", string_substring)?;
    engine.add_native("function String.charAt(pos)", string_char_at)?;
    engine.add_native("function String.charCodeAt(pos)", string_char_code_at)?;
    engine.add_native("function String.fromCharCode(char)", string_from_char_code)?;
    engine.add_native("function String.split(separator)", string_split)?;
    engine.add_native("function String.match(regex)", string_match)?;
    Ok(())
}
