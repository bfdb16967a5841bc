//! Runs every sample program and checks that it set `result`.

mod sample_programs;

use sample_programs::PROGRAMS;
use sprig::{Engine, Value};

#[test]
fn sample_programs_pass() {
    let mut failures = Vec::new();
    for program in PROGRAMS.iter() {
        let mut engine = Engine::default();
        let root = engine.root();
        let zero = engine.heap_mut().alloc(Value::Int(0));
        engine.heap_mut().add_child(root, "result", zero);

        let outcome = engine.execute(program.source);
        let passed = engine.get("result").is_some_and(Value::as_bool);
        if !passed {
            let reason = match outcome {
                Ok(()) => "result was not truthy".to_string(),
                Err(e) => e.to_string(),
            };
            failures.push(format!("{}: {}\n{}", program.name, reason, engine.trace()));
        }
    }
    assert!(failures.is_empty(), "failing programs:\n{}", failures.join("\n"));
}
