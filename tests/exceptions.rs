#[macro_use]
mod common;

use indoc::indoc;
use pretty_assertions::assert_eq;

script_test!(
    catch_binds_thrown_value,
    input: "var r; try { throw \"bad\"; } catch (e) { r = \"caught \" + e; }",
    globals: { "r" => "caught bad" },
);

script_test!(
    code_after_throw_is_skipped,
    input: "var after = 0; try { throw 1; after = 1; } catch (e) { }",
    globals: { "after" => "0" },
);

script_test!(
    try_without_throw_skips_catch,
    input: "var c = 0; var t = 0; try { t = 1; } catch (e) { c = 1; }",
    globals: { "t" => "1", "c" => "0" },
);

script_test!(
    finally_runs_once_per_try,
    input: indoc! {"
        var f = 0;
        try { throw \"x\"; } catch (e) { } finally { f = f + 1; }
        try { } catch (e) { } finally { f = f + 1; }
        var leaked = typeof e;
    "},
    globals: { "f" => "2", "leaked" => "undefined" },
);

script_test!(
    try_finally_without_catch_rethrows,
    input: indoc! {"
        var f = 0; var r;
        try {
            try { throw \"inner\"; } finally { f = 1; }
        } catch (e) { r = e; }
    "},
    globals: { "f" => "1", "r" => "inner" },
);

script_test!(
    throw_unwinds_through_calls,
    input: indoc! {"
        var steps = 0;
        function deep(n) { steps++; if (n == 0) throw { code: 7 }; deep(n - 1); steps = 100; }
        var code;
        try { deep(3); } catch (err) { code = err.code; }
    "},
    globals: { "steps" => "4", "code" => "7" },
);

script_test!(
    rethrow_from_catch,
    input: indoc! {"
        var r;
        try {
            try { throw 1; } catch (e) { throw e + 1; }
        } catch (e) { r = e; }
    "},
    globals: { "r" => "2" },
);

script_test!(
    return_inside_try_runs_finally,
    input: indoc! {"
        var cleaned = 0;
        function f() { try { return 5; } finally { cleaned = 1; } }
        var r = f();
    "},
    globals: { "r" => "5", "cleaned" => "1" },
);

script_test!(
    break_inside_try_leaves_loop,
    input: "var i = 0; while (1) { try { i++; if (i == 3) break; } catch (e) { } }",
    globals: { "i" => "3" },
);

script_test!(
    const_assignment_throws_type_error,
    input: indoc! {"
        const pi = 3;
        var message;
        try { pi = 4; } catch (e) { message = e; }
    "},
    globals: {
        "message" => "TypeError: Assignment to constant variable 'pi'",
        "pi" => "3",
    },
);

script_test!(
    const_increment_throws_too,
    input: "const n = 1; var r = 0; try { n++; } catch (e) { r = 1; }",
    globals: { "r" => "1", "n" => "1" },
);

script_test!(
    uncaught_throw_is_runtime_error,
    input: "throw \"nobody catches this\";",
    error: "R003",
);

#[test]
fn uncaught_throw_keeps_earlier_statements() {
    let mut engine = sprig::Engine::default();
    let error = engine
        .execute("var before = 1; throw { reason: \"x\" }; var after = 2;")
        .unwrap_err();
    assert!(error.to_string().contains("Uncaught exception"));
    assert_eq!(engine.get_int("before"), Some(1));
    assert_eq!(engine.lookup("after"), None);
}

#[test]
fn fatal_errors_are_not_catchable() {
    let mut engine = sprig::Engine::default();
    let error = engine
        .execute("var c = 0; try { var z = 1 / 0; } catch (e) { c = 1; } finally { c = 2; }")
        .unwrap_err();
    assert_eq!(error.diagnostic().and_then(|d| d.code.as_deref()), Some("R004"));
    assert_eq!(engine.get_int("c"), Some(0));
}
