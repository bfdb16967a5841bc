//! Tests for the String package

use crate::api::{Engine, EngineOptions};
use crate::values::Value;

// Bind `s` to `literal`, then evaluate `s.<method>`.
fn call_on(literal: &str, method: &str) -> Value {
    let mut engine = Engine::new(EngineOptions::default());
    engine
        .execute(&format!("var s = {};", literal))
        .unwrap_or_else(|e| panic!("binding should succeed for: {}\nError: {}", literal, e));
    let source = format!("s.{}", method);
    let id = engine
        .eval_complex(&source)
        .unwrap_or_else(|e| panic!("evaluation should succeed for: {}\nError: {}", source, e));
    engine.heap().get(id).clone()
}

fn call_string(literal: &str, method: &str) -> String {
    call_on(literal, method).to_display_string()
}

fn run(source: &str) -> Engine {
    let mut engine = Engine::default();
    engine
        .execute(source)
        .unwrap_or_else(|e| panic!("execution should succeed for: {}\nError: {}", source, e));
    engine
}

#[test]
fn test_index_of() {
    assert_eq!(call_on("\"hello world\"", "indexOf(\"world\")").as_int(), 6);
    assert_eq!(call_on("\"hello\"", "indexOf(\"z\")").as_int(), -1);
    assert_eq!(call_on("\"hello\"", "indexOf(\"\")").as_int(), 0);
}

#[test]
fn test_index_of_counts_characters() {
    assert_eq!(call_on("\"héllo\"", "indexOf(\"l\")").as_int(), 2);
}

#[test]
fn test_substring() {
    assert_eq!(call_string("\"abcdef\"", "substring(1, 4)"), "bcd");
    assert_eq!(call_string("\"abcdef\"", "substring(4, 1)"), "bcd");
    assert_eq!(call_string("\"abcdef\"", "substring(3)"), "def");
    assert_eq!(call_string("\"abc\"", "substring(-5, 99)"), "abc");
    assert_eq!(call_string("\"abc\"", "substring(2, 2)"), "");
}

#[test]
fn test_char_at_and_codes() {
    assert_eq!(call_string("\"abc\"", "charAt(1)"), "b");
    assert_eq!(call_string("\"abc\"", "charAt(7)"), "");
    assert_eq!(call_on("\"abc\"", "charCodeAt(0)").as_int(), 97);
    assert_eq!(call_on("\"abc\"", "charCodeAt(9)").as_int(), 0);
}

#[test]
fn test_from_char_code() {
    let engine = run("var a = String.fromCharCode(65);");
    assert_eq!(engine.get_string("a").as_deref(), Some("A"));
}

#[test]
fn test_split() {
    let engine = run("var s = \"a,b,,c\"; var parts = s.split(\",\"); var n = parts.length;");
    assert_eq!(engine.get_int("n"), Some(4));
    assert_eq!(engine.get_string("parts.0").as_deref(), Some("a"));
    assert_eq!(engine.get_string("parts.2").as_deref(), Some(""));
    assert_eq!(engine.get_string("parts.3").as_deref(), Some("c"));
}

#[test]
fn test_split_empty_separator_gives_characters() {
    let engine = run("var s = \"xyz\"; var chars = s.split(\"\");");
    assert_eq!(engine.get_string("chars.1").as_deref(), Some("y"));
    assert_eq!(engine.get("chars").map(Value::is_array), Some(true));
}

#[test]
fn test_match_returns_groups() {
    let engine = run("var s = \"key=value\"; var m = s.match(/(\\w+)=(\\w+)/);");
    assert_eq!(engine.get_string("m.0").as_deref(), Some("key=value"));
    assert_eq!(engine.get_string("m.1").as_deref(), Some("key"));
    assert_eq!(engine.get_string("m.2").as_deref(), Some("value"));
}

#[test]
fn test_match_without_hit_is_null() {
    assert!(call_on("\"abc\"", "match(/\\d+/)").is_null());
}

#[test]
fn test_match_accepts_pattern_string() {
    let engine = run("var s = \"abc123\"; var m = s.match(\"[0-9]+\");");
    assert_eq!(engine.get_string("m.0").as_deref(), Some("123"));
}

#[test]
fn test_methods_chain_through_results() {
    let engine = run("var s = \"banana\"; var i = s.indexOf(\"nan\"); var c = s.charAt(i);");
    assert_eq!(engine.get_int("i"), Some(2));
    assert_eq!(engine.get_string("c").as_deref(), Some("n"));
}
