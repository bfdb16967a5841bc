//! Self-checking sample programs. Each one sets the global `result` to a
//! truthy value when it passes.

use once_cell::sync::Lazy;

pub struct Program {
    pub name: &'static str,
    pub source: &'static str,
}

pub static PROGRAMS: Lazy<Vec<Program>> = Lazy::new(|| {
    vec![
        Program {
            name: "simple_assignment",
            source: "var a = 42; result = a == 42;",
        },
        Program {
            name: "arithmetic_precedence",
            source: "var a = 2 + 3 * 4 - 6 / 2; result = a == 11;",
        },
        Program {
            name: "mixed_number_kinds",
            source: "var a = 7 / 2; var b = 7.0 / 2; result = a == 3 && b == 3.5;",
        },
        Program {
            name: "string_concatenation",
            source: r#"var s = "a" + 1 + 2.5; result = s == "a12.5";"#,
        },
        Program {
            name: "nested_objects",
            source: r#"
                var a = { b: { c: { d: "deep" } } };
                a.b.e = 5;
                result = a.b.c.d == "deep" && a.b.e == 5;
            "#,
        },
        Program {
            name: "array_growth",
            source: r#"
                var a = [];
                for (var i = 0; i < 10; i++) a[i] = i * i;
                result = a.length == 10 && a[9] == 81;
            "#,
        },
        Program {
            name: "while_sum",
            source: r#"
                var i = 0; var sum = 0;
                while (i < 100) { i++; if (i % 2 == 0) continue; sum += i; }
                result = sum == 2500;
            "#,
        },
        Program {
            name: "nested_loops_with_break",
            source: r#"
                var count = 0;
                for (var i = 0; i < 5; i++) {
                    for (var j = 0; j < 5; j++) {
                        if (j > i) break;
                        count++;
                    }
                }
                result = count == 15;
            "#,
        },
        Program {
            name: "recursive_factorial",
            source: r#"
                function fact(n) { if (n <= 1) return 1; return n * fact(n - 1); }
                result = fact(10) == 3628800;
            "#,
        },
        Program {
            name: "function_as_argument",
            source: r#"
                function map(list, f) {
                    var out = [];
                    for (var i = 0; i < list.length; i++) out[i] = f(list[i]);
                    return out;
                }
                var doubled = map([1, 2, 3], function(x) { return x * 2; });
                result = doubled.join(",") == "2,4,6";
            "#,
        },
        Program {
            name: "constructor_and_prototype",
            source: r#"
                var Shape = { area: function() { return this.w * this.h; } };
                var box = new Shape();
                box.w = 3; box.h = 4;
                result = box.area() == 12;
            "#,
        },
        Program {
            name: "switch_dispatch",
            source: r#"
                function name(n) {
                    var s = "other";
                    switch (n) {
                        case 1: s = "one"; break;
                        case 2: s = "two"; break;
                        default: s = "many"; break;
                    }
                    return s;
                }
                result = name(1) == "one" && name(2) == "two" && name(9) == "many";
            "#,
        },
        Program {
            name: "exceptions_unwind",
            source: r#"
                var log = "";
                function risky(n) { if (n > 2) throw "too big"; return n; }
                for (var i = 0; i < 5; i++) {
                    try { log = log + risky(i); } catch (e) { log = log + "!"; }
                }
                result = log == "012!!";
            "#,
        },
        Program {
            name: "const_protection",
            source: r#"
                const limit = 10;
                var blocked = 0;
                try { limit = 11; } catch (e) { blocked = 1; }
                result = blocked && limit == 10;
            "#,
        },
        Program {
            name: "regex_matching",
            source: r#"
                var s = "id=1234";
                var m = s.match(/id=(\d+)/);
                result = m[1] == "1234" && typeof /x/ == "object";
            "#,
        },
        Program {
            name: "json_round_trip",
            source: r#"
                var o = { list: [1, 2], name: "x" };
                var copy = JSON.parse(JSON.stringify(o));
                result = copy.list[1] == 2 && copy.name == "x";
            "#,
        },
        Program {
            name: "ternary_and_logic",
            source: r#"
                var a = 5;
                var b = a > 3 ? "big" : "small";
                var c = (a < 3 || a == 5) && !(a == 4);
                result = b == "big" && c;
            "#,
        },
        Program {
            name: "do_while_runs_once",
            source: "var n = 0; do { n++; } while (0); result = n == 1;",
        },
    ]
});
