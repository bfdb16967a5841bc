//! Textual renderings of heap values: parsable literals, JSON and traces.

use core::fmt::Write;

use super::function::FunctionBody;
use super::heap::{Heap, PROTOTYPE, ValueId};
use super::value::Value;
use crate::String;

const INDENT: &str = "    ";

/// Quote and escape a string the way script literals spell it.
///
/// Control characters and U+0080..=U+00FF become `\xHH`, which the lexer
/// reads back as the same character.
pub fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            '"' => out.push_str("\\\""),
            c if (c as u32) < 32 || (128..=255).contains(&(c as u32)) => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            // `\xHH` only spans one byte; wider characters stay literal.
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Formal parameter names of a function value.
pub fn parameter_names(heap: &Heap, id: ValueId) -> impl Iterator<Item = &str> {
    heap.children(id)
        .iter()
        .filter(|link| link.name != PROTOTYPE)
        .map(|link| link.name.as_str())
}

/// Render a leaf value as script source.
///
/// Functions render as `function (a, b)` followed by the body text.
pub fn parsable_string(heap: &Heap, id: ValueId) -> String {
    match heap.get(id) {
        Value::Int(_) | Value::Double(_) => heap.get(id).to_display_string(),
        Value::Function(body) => {
            let params: crate::Vec<&str> = parameter_names(heap, id).collect();
            let mut out = alloc::format!("function ({})", params.join(", "));
            if let FunctionBody::Script(text) = body {
                out.push_str(text);
            }
            out
        }
        Value::Str(text) => js_string(text),
        Value::Regexp(regex) => regex.literal(),
        Value::Null => "null".into(),
        Value::Undefined => "undefined".into(),
        Value::Object => "{}".into(),
        Value::Array => "[]".into(),
    }
}

/// Pretty-print a value graph as JSON with four-space indentation.
///
/// `prototype` links are not followed.
pub fn to_json(heap: &Heap, id: ValueId) -> String {
    let mut out = String::new();
    write_json(heap, id, 0, &mut out);
    out
}

fn write_json(heap: &Heap, id: ValueId, depth: usize, out: &mut String) {
    match heap.get(id) {
        Value::Object => {
            let fields: crate::Vec<_> = heap
                .children(id)
                .iter()
                .filter(|link| link.name != PROTOTYPE)
                .collect();
            if fields.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, link) in fields.iter().enumerate() {
                push_indent(out, depth + 1);
                out.push_str(&js_string(&link.name));
                out.push_str(": ");
                write_json(heap, link.value, depth + 1, out);
                if i + 1 < fields.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::Array => {
            let len = heap.array_len(id);
            if len == 0 {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for index in 0..len {
                push_indent(out, depth + 1);
                match heap.array_get(id, index) {
                    Some(item) => write_json(heap, item, depth + 1, out),
                    None => out.push_str("undefined"),
                }
                if index + 1 < len {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, depth);
            out.push(']');
        }
        _ => out.push_str(&parsable_string(heap, id)),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Type flags as shown by traces and scope dumps.
pub fn kind_flags(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Int(_) => "Integer",
        Value::Double(_) => "Double",
        Value::Str(_) => "String",
        Value::Regexp(_) => "Regexp",
        Value::Object => "Object",
        Value::Array => "Array",
        Value::Function(FunctionBody::Script(_)) => "Function",
        Value::Function(FunctionBody::Native(_)) => "Function|Native",
    }
}

/// Indented dump of a value graph, one line per node:
/// `{indent}{name} = '{text}' ({flags})`.
///
/// Prototype links are printed but not descended into.
pub fn trace(heap: &Heap, id: ValueId, name: &str) -> String {
    let mut out = String::new();
    write_trace(heap, id, name, 0, &mut out);
    out
}

fn write_trace(heap: &Heap, id: ValueId, name: &str, indent: usize, out: &mut String) {
    let value = heap.get(id);
    let _ = writeln!(
        out,
        "{:indent$}{} = '{}' ({})",
        "",
        name,
        value.to_display_string(),
        kind_flags(value),
        indent = indent
    );
    for link in heap.children(id) {
        if link.name == PROTOTYPE {
            let _ = writeln!(out, "{:indent$}prototype = <class>", "", indent = indent + 2);
            continue;
        }
        write_trace(heap, link.value, &link.name, indent + 2, out);
    }
}
