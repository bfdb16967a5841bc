#[macro_use]
mod common;

use indoc::indoc;

script_test!(
    if_else_chain,
    input: indoc! {"
        function grade(n) {
            if (n >= 90) return \"A\";
            else if (n >= 80) return \"B\";
            else return \"C\";
        }
        var a = grade(95); var b = grade(85); var c = grade(10);
    "},
    globals: { "a" => "A", "b" => "B", "c" => "C" },
);

script_test!(
    untaken_branch_has_no_effects,
    input: "var hits = 0; if (0) { hits = hits + 1; missing(); } else { hits = 10; }",
    globals: { "hits" => "10" },
);

script_test!(
    strings_and_objects_are_falsy,
    input: "var a = 0; var b = 0; if (\"text\") { a = 1; } if ({}) { b = 1; }",
    globals: { "a" => "0", "b" => "0" },
);

script_test!(
    while_loop,
    input: "var i = 0; var sum = 0; while (i < 10) { sum += i; i++; }",
    globals: { "sum" => "45", "i" => "10" },
);

script_test!(
    while_loop_that_never_runs,
    input: "var ran = 0; while (0) { ran = 1; }",
    globals: { "ran" => "0" },
);

script_test!(
    for_loop,
    input: "var product = 1; for (var i = 1; i <= 5; i++) { product *= i; }",
    globals: { "product" => "120" },
);

script_test!(
    nested_loops_with_break_and_continue,
    input: indoc! {"
        var pairs = 0;
        for (var i = 0; i < 5; i++) {
            if (i == 1) continue;
            for (var j = 0; j < 5; j++) {
                if (j > i) break;
                pairs++;
            }
        }
    "},
    // i = 0: 1, i = 2: 3, i = 3: 4, i = 4: 5
    globals: { "pairs" => "13" },
);

script_test!(
    do_while_loop,
    input: "var n = 0; do { n += 2; } while (n < 7);",
    globals: { "n" => "8" },
);

script_test!(
    continue_in_while_loop,
    input: "var i = 0; var odd = 0; while (i < 6) { i++; if (i % 2 == 0) continue; odd += i; }",
    globals: { "odd" => "9" },
);

script_test!(
    return_from_inside_loop,
    input: indoc! {"
        function find(list, wanted) {
            for (var i = 0; i < list.length; i++) {
                if (list[i] == wanted) return i;
            }
            return -1;
        }
        var list = [4, 8, 15, 16];
        var hit = find(list, 15);
        var miss = find(list, 23);
    "},
    globals: { "hit" => "2", "miss" => "-1" },
);

script_test!(
    switch_with_mandatory_break,
    input: indoc! {r#"
        function name(n) {
            var out = "";
            switch (n) {
                case 1: out = "one"; break;
                case 2: out = "two"; break;
                default: out = "many"; break;
            }
            return out;
        }
        var a = name(1); var b = name(2); var c = name(7);
    "#},
    globals: { "a" => "one", "b" => "two", "c" => "many" },
);

script_test!(
    switch_compares_loosely,
    input: "var r = 0; switch (\"2\") { case 2: r = 1; break; default: r = 2; break; }",
    globals: { "r" => "1" },
);

script_test!(
    switch_clause_runs_several_statements,
    input: "var a = 0; var b = 0; switch (3) { case 3: a = 1; b = 2; break; }",
    globals: { "a" => "1", "b" => "2" },
);

script_test!(
    blocks_do_not_scope,
    input: "{ var inner = 1; } var outer = inner + 1;",
    globals: { "outer" => "2" },
);

#[test]
fn iteration_limit_stops_runaway_loops() {
    use sprig::{Engine, EngineOptions, Error, ExecutionOptions};

    let mut engine = Engine::new(EngineOptions {
        execution: ExecutionOptions {
            max_iterations: Some(1_000),
            ..Default::default()
        },
        ..Default::default()
    });
    let error = engine.execute("var i = 0; for (;;) { i++; }").unwrap_err();
    assert!(matches!(error, Error::ResourceExceeded { .. }));
    pretty_assertions::assert_eq!(engine.get_int("i"), Some(1_000));
}
