#[macro_use]
mod common;

use indoc::indoc;
use pretty_assertions::assert_eq;
use sprig::{Engine, MemoryConsole};

script_test!(
    math_integer_functions,
    input: indoc! {"
        var a = Math.abs(-7);
        var lo = Math.min(3, 9);
        var hi = Math.max(3, 9);
        var f = Math.floor(2.7);
        var c = Math.ceil(2.1);
        var r = Math.round(2.5);
    "},
    globals: { "a" => "7", "lo" => "3", "hi" => "9", "f" => "2", "c" => "3", "r" => "3" },
);

script_test!(
    math_double_functions,
    input: "var p = Math.pow(2, 10); var s = Math.sqrt(16); var m = Math.min(1.5, 2);",
    globals: { "p" => "1024", "s" => "4", "m" => "1.5" },
);

script_test!(
    math_constants,
    input: "var big = Math.PI > 3.14 && Math.PI < 3.15; var e = Math.E > 2.7;",
    globals: { "big" => "1", "e" => "1" },
);

#[test]
fn random_numbers_stay_in_range() {
    let engine = common::run(indoc! {"
        var ok = 1;
        for (var i = 0; i < 50; i++) {
            var r = Math.random();
            var n = Math.randInt(3, 5);
            if (r < 0 || r >= 1 || n < 3 || n > 5) ok = 0;
        }
    "});
    assert_eq!(engine.get_int("ok"), Some(1));
}

script_test!(
    string_methods,
    input: indoc! {r#"
        var s = "Hello, World";
        var i = s.indexOf("World");
        var sub = s.substring(0, 5);
        var ch = s.charAt(7);
        var code = s.charCodeAt(0);
        var len = s.length;
    "#},
    globals: { "i" => "7", "sub" => "Hello", "ch" => "W", "code" => "72", "len" => "12" },
);

script_test!(
    string_split_and_array_join,
    input: indoc! {r#"
        var csv = "a;b;c";
        var parts = csv.split(";");
        var back = parts.join("+");
        var count = parts.length;
    "#},
    globals: { "back" => "a+b+c", "count" => "3" },
);

script_test!(
    string_match_with_regex,
    input: r#"var date = "2024-05-17"; var m = date.match(/(\d+)-(\d+)-(\d+)/); var year = m[1]; var day = m[3];"#,
    globals: { "year" => "2024", "day" => "17" },
);

script_test!(
    array_methods,
    input: indoc! {"
        var list = [3, 1, 4];
        list.push(1);
        var has = list.contains(4);
        list.remove(1);
        var joined = list.join(\",\");
    "},
    globals: { "has" => "1", "joined" => "3,4" },
);

script_test!(
    number_parsing,
    input: indoc! {r#"
        var a = parseInt("42");
        var b = parseInt("-17abc");
        var c = parseInt("0x1F");
        var d = parseFloat("3.25 meters");
        var e = parseInt("nothing");
    "#},
    globals: { "a" => "42", "b" => "-17", "c" => "31", "d" => "3.25", "e" => "0" },
);

script_test!(
    eval_returns_last_expression,
    input: "var x = 4; var r = eval(\"x * 2; x * 3\");",
    globals: { "r" => "12" },
);

script_test!(
    exec_runs_against_root,
    input: "function setup() { exec(\"var made = 9;\"); } setup();",
    globals: { "made" => "9" },
);

script_test!(
    json_stringify_and_parse,
    input: indoc! {r#"
        var data = { name: "sprig", tags: ["a", "b"], nested: { n: 1 } };
        var text = JSON.stringify(data);
        var copy = JSON.parse(text);
        var name = copy.name;
        var tag = copy.tags[1];
        var n = copy.nested.n;
    "#},
    globals: { "name" => "sprig", "tag" => "b", "n" => "1" },
);

script_test!(
    json_keeps_non_ascii_text,
    input: indoc! {r#"
        var s = "caf\xe9 costs 3€\n";
        var copy = JSON.parse(JSON.stringify(s));
        var same = copy == s;
    "#},
    globals: { "same" => "1", "copy" => "café costs 3€\n" },
);

#[test]
fn json_stringify_layout() {
    let engine = common::run("var text = JSON.stringify({ a: 1, b: [true, \"x\"] });");
    let expected = indoc! {r#"
        {
            "a": 1,
            "b": [
                1,
                "x"
            ]
        }"#};
    assert_eq!(engine.get_string("text").as_deref(), Some(expected));
}

#[test]
fn console_output_goes_to_the_configured_sink() {
    let console = MemoryConsole::new();
    let mut engine = Engine::default();
    engine.set_console(console.clone());
    engine
        .execute(indoc! {r#"
            console.log("first");
            console.clear();
            for (var i = 0; i < 3; i++) console.log("line " + i);
            console.error("oops");
        "#})
        .unwrap();
    assert_eq!(
        console.lines(),
        vec!["line 0", "line 1", "line 2", "error: oops"]
    );
}

#[test]
fn trace_dumps_root() {
    let engine = common::run("var answer = 42;");
    let dump = engine.trace();
    assert!(dump.starts_with("root"), "dump: {}", dump);
    assert!(dump.contains("answer = '42'"), "dump: {}", dump);
}
