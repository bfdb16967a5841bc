//! Array Package
//!
//! Methods on the `Array` class. Elements are the receiver's
//! integer-named children.

use crate::api::{Engine, Error, NativeCall, NativeResult};
use crate::interpreter::Interrupt;
use crate::values::{LinkId, Value, ValueId, values_equal};
use crate::{String, ToString, Vec};

/// Elements of `array` as `(link, value, index)`, ordered by index.
fn elements(call: &NativeCall<'_>, array: ValueId) -> Vec<(LinkId, ValueId, i32)> {
    let mut elements: Vec<_> = call
        .heap()
        .children(array)
        .iter()
        .filter_map(|link| Some((link.id, link.value, link.name.parse::<i32>().ok()?)))
        .filter(|(_, _, index)| *index >= 0)
        .collect();
    elements.sort_by_key(|(_, _, index)| *index);
    elements
}

fn equals(call: &NativeCall<'_>, a: ValueId, b: ValueId) -> Result<bool, Interrupt> {
    values_equal(call.heap(), a, b).map_err(|kind| call.error(kind.to_string()))
}

fn array_contains(call: &mut NativeCall<'_>) -> NativeResult {
    let (Some(array), Some(item)) = (call.this(), call.arg("item")) else {
        call.set_return(Value::bool(false));
        return Ok(());
    };
    let mut found = false;
    for (_, value, _) in elements(call, array) {
        if equals(call, value, item)? {
            found = true;
            break;
        }
    }
    call.set_return(Value::bool(found));
    Ok(())
}

/// Remove every element equal to `item` and close the gaps.
fn array_remove(call: &mut NativeCall<'_>) -> NativeResult {
    let (Some(array), Some(item)) = (call.this(), call.arg("item")) else {
        return Ok(());
    };
    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for (link, value, _) in elements(call, array) {
        if equals(call, value, item)? {
            removed.push(link);
        } else {
            kept.push(link);
        }
    }

    let heap = call.heap_mut();
    for link in removed {
        heap.remove_child(array, link);
    }
    for (index, link) in kept.into_iter().enumerate() {
        heap.rename_child(array, link, index.to_string());
    }
    Ok(())
}

/// Display strings of `0..length` joined by `separator`; holes read as
/// `undefined`.
fn array_join(call: &mut NativeCall<'_>) -> NativeResult {
    let separator = match call.arg_value("separator") {
        Some(value) if !value.is_undefined() => value.to_display_string(),
        _ => String::new(),
    };
    let joined = match call.this() {
        Some(array) => {
            let heap = call.heap();
            (0..heap.array_len(array))
                .map(|index| match heap.array_get(array, index) {
                    Some(id) => heap.get(id).to_display_string(),
                    None => "undefined".to_string(),
                })
                .collect::<Vec<_>>()
                .join(&separator)
        }
        None => String::new(),
    };
    call.set_return(Value::string(joined));
    Ok(())
}

/// Append `item`; returns the new length.
fn array_push(call: &mut NativeCall<'_>) -> NativeResult {
    let Some(array) = call.this() else {
        return Ok(());
    };
    let item = match call.arg("item") {
        Some(item) => item,
        None => call.heap_mut().alloc(Value::Undefined),
    };
    let heap = call.heap_mut();
    heap.array_push(array, item);
    let len = heap.array_len(array);
    call.set_return(Value::Int(len));
    Ok(())
}

/// Register the methods of the `Array` class.
pub fn register_array(engine: &mut Engine) -> Result<(), Error> {
    engine.add_native("function Array.contains(item)", array_contains)?;
    engine.add_native("function Array.remove(item)", array_remove)?;
    engine.add_native("function Array.join(separator)", array_join)?;
    engine.add_native("function Array.push(item)", array_push)?;
    Ok(())
}
