//! Save and restore of engine state through binary snapshots.

use pretty_assertions::assert_eq;
use sprig_core::api::{Engine, EngineOptions, Error};
use sprig_core::snapshot::{self, Snapshot};
use sprig_core::values::{Heap, Value};

fn engine_with_test_func() -> Engine {
    let mut engine = Engine::new(EngineOptions::default());
    engine
        .add_native("function testFunc(a, b)", |call| {
            let sum = call.arg_int("a") + call.arg_int("b");
            call.set_return(Value::Int(sum));
            Ok(())
        })
        .unwrap();
    engine
}

#[test]
fn test_variables_survive_restore() {
    let mut source = Engine::default();
    source.execute("var x = 10; var y = 20;").unwrap();
    let snapshot = source.save_state().unwrap();

    let mut target = Engine::default();
    target.restore_state(&snapshot).unwrap();
    target.execute("var result = x + y;").unwrap();
    assert_eq!(target.get_int("result"), Some(30));
}

#[test]
fn test_native_functions_rebind_by_path() {
    let mut source = engine_with_test_func();
    source.execute("var seed = 5;").unwrap();
    let snapshot = source.save_state().unwrap();
    assert!(snapshot.native_function_names.iter().any(|name| name == "testFunc"));

    let mut target = engine_with_test_func();
    target.restore_state(&snapshot).unwrap();
    target.execute("var result = testFunc(seed, 10);").unwrap();
    assert_eq!(target.get_int("result"), Some(15));
}

#[test]
fn test_missing_native_fails_and_keeps_state() {
    let mut source = engine_with_test_func();
    source.execute("var x = 1;").unwrap();
    let snapshot = source.save_state().unwrap();

    let mut target = Engine::default();
    target.execute("var x = 2;").unwrap();
    let result = target.restore_state(&snapshot);
    assert!(matches!(result, Err(Error::Snapshot(_))));
    assert_eq!(target.get_int("x"), Some(2));
}

#[test]
fn test_garbage_bytes_are_rejected() {
    let mut engine = Engine::default();
    let snapshot = Snapshot {
        root_state: vec![0xde, 0xad, 0xbe, 0xef],
        native_function_names: vec![],
    };
    assert!(matches!(engine.restore_state(&snapshot), Err(Error::Snapshot(_))));
}

#[test]
fn test_objects_arrays_and_functions_round_trip() {
    let mut source = Engine::default();
    source
        .execute(
            "var point = { x: 1, y: \"two\" }; var list = [1, 2.5, null]; \
             function twice(n) { return n * 2; } const fixed = 3; var re = /a+/g;",
        )
        .unwrap();
    let snapshot = source.save_state().unwrap();

    let mut target = Engine::default();
    target.restore_state(&snapshot).unwrap();
    target
        .execute("var t = twice(21); var n = list.length; var caught = 0; try { fixed = 4; } catch (e) { caught = 1; }")
        .unwrap();
    assert_eq!(target.get_int("point.x"), Some(1));
    assert_eq!(target.get_string("point.y").as_deref(), Some("two"));
    assert_eq!(target.get_double("list.1"), Some(2.5));
    assert_eq!(target.get("list.2").map(Value::is_null), Some(true));
    assert_eq!(target.get_int("t"), Some(42));
    assert_eq!(target.get_int("n"), Some(3));
    assert_eq!(target.get_int("caught"), Some(1));
    assert_eq!(target.get_string("re").as_deref(), Some("/a+/g"));
}

#[test]
fn test_prototype_links_survive() {
    let mut source = Engine::default();
    source
        .execute("var Animal = { speak: function() { return \"hi\"; } }; var a = new Animal();")
        .unwrap();
    let snapshot = source.save_state().unwrap();

    let mut target = Engine::default();
    target.restore_state(&snapshot).unwrap();
    target.execute("var s = a.speak();").unwrap();
    assert_eq!(target.get_string("s").as_deref(), Some("hi"));
}

#[test]
fn test_class_methods_work_after_restore() {
    let mut source = Engine::default();
    source.execute("var s = \"a-b\";").unwrap();
    let snapshot = source.save_state().unwrap();

    let mut target = Engine::default();
    target.restore_state(&snapshot).unwrap();
    target.execute("var parts = s.split(\"-\"); var n = parts.length;").unwrap();
    assert_eq!(target.get_int("n"), Some(2));
}

#[test]
fn test_standalone_value_round_trip() {
    let mut engine = Engine::default();
    engine.execute("var data = { a: [1, 2], b: { c: \"d\" } };").unwrap();
    let id = engine.lookup("data").unwrap();
    let bytes = snapshot::encode_value(engine.heap(), id).unwrap();

    let mut heap = Heap::new();
    let copy = snapshot::decode_value(&mut heap, &bytes).unwrap();
    heap.retain(copy);
    let b = heap.find_child(copy, "b").unwrap().value;
    let c = heap.find_child(b, "c").unwrap().value;
    assert_eq!(heap.get(c).to_display_string(), "d");
    let a = heap.find_child(copy, "a").unwrap().value;
    assert_eq!(heap.array_len(a), 2);
}
