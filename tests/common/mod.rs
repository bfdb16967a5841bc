//! Shared helpers for the end-to-end script tests.

#![allow(dead_code)]

use sprig::{Engine, Error};

/// Run `source` on a fresh engine with the standard library.
pub fn run(source: &str) -> Engine {
    let mut engine = Engine::default();
    if let Err(e) = engine.execute(source) {
        panic!("execution should succeed for:\n{}\nError: {}", source, e);
    }
    engine
}

/// Run `source`, which must fail, and return the error.
pub fn run_err(source: &str) -> Error {
    let mut engine = Engine::default();
    match engine.execute(source) {
        Ok(()) => panic!("execution should fail for:\n{}", source),
        Err(e) => e,
    }
}

/// Error code of the diagnostic `source` fails with.
pub fn error_code(source: &str) -> Option<String> {
    run_err(source).diagnostic().and_then(|d| d.code.clone())
}

/// Declare a test that runs a script and checks globals by their display
/// string, or checks the error code the script fails with.
///
/// ```ignore
/// script_test!(
///     addition,
///     input: "var r = 1 + 2;",
///     globals: { "r" => "3" },
/// );
///
/// script_test!(
///     bad_division,
///     input: "var r = 1 / 0;",
///     error: "R004",
/// );
/// ```
macro_rules! script_test {
    ($name:ident, input: $input:expr, globals: { $($path:literal => $value:expr),* $(,)? } $(,)?) => {
        #[test]
        fn $name() {
            let engine = crate::common::run($input);
            $(
                pretty_assertions::assert_eq!(
                    engine.get_string($path).as_deref(),
                    Some($value),
                    "global `{}`",
                    $path
                );
            )*
        }
    };
    ($name:ident, input: $input:expr, error: $code:literal $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(crate::common::error_code($input).as_deref(), Some($code));
        }
    };
}
