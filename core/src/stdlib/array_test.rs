//! Tests for the Array package

use crate::api::Engine;

// Run a script and hand back the engine for inspection.
fn run(source: &str) -> Engine {
    let mut engine = Engine::default();
    engine
        .execute(source)
        .unwrap_or_else(|e| panic!("execution should succeed for: {}\nError: {}", source, e));
    engine
}

#[test]
fn test_push_appends_and_returns_length() {
    let engine = run("var a = [1, 2]; var n = a.push(3); var len = a.length;");
    assert_eq!(engine.get_int("n"), Some(3));
    assert_eq!(engine.get_int("len"), Some(3));
    assert_eq!(engine.get_int("a.2"), Some(3));
}

#[test]
fn test_push_onto_empty_array() {
    let engine = run("var a = []; a.push(\"x\"); a.push(\"y\");");
    assert_eq!(engine.get_string("a.0").as_deref(), Some("x"));
    assert_eq!(engine.get_string("a.1").as_deref(), Some("y"));
}

#[test]
fn test_contains() {
    let engine = run("var a = [1, \"two\", 3]; var yes = a.contains(\"two\"); var no = a.contains(4);");
    assert_eq!(engine.get_int("yes"), Some(1));
    assert_eq!(engine.get_int("no"), Some(0));
}

#[test]
fn test_remove_renumbers() {
    let engine = run("var a = [1, 2, 1, 3]; a.remove(1); var len = a.length;");
    assert_eq!(engine.get_int("len"), Some(2));
    assert_eq!(engine.get_int("a.0"), Some(2));
    assert_eq!(engine.get_int("a.1"), Some(3));
    assert!(engine.lookup("a.2").is_none());
}

#[test]
fn test_remove_missing_item_keeps_array() {
    let engine = run("var a = [5, 6]; a.remove(7); var len = a.length;");
    assert_eq!(engine.get_int("len"), Some(2));
    assert_eq!(engine.get_int("a.1"), Some(6));
}

#[test]
fn test_join() {
    let engine = run("var a = [1, 2, 3]; var b = [\"a\"]; var c = []; var s = a.join(\"-\"); var t = b.join(\",\"); var e = c.join(\",\");");
    assert_eq!(engine.get_string("s").as_deref(), Some("1-2-3"));
    assert_eq!(engine.get_string("t").as_deref(), Some("a"));
    assert_eq!(engine.get_string("e").as_deref(), Some(""));
}

#[test]
fn test_join_without_separator() {
    let engine = run("var a = [\"x\", \"y\"]; var s = a.join();");
    assert_eq!(engine.get_string("s").as_deref(), Some("xy"));
}
