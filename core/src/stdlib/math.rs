//! Math Package
//!
//! Functions: min, max, abs, floor, ceil, round, acos, asin, atan, atan2,
//!            cos, cosh, exp, log, pow, sin, sinh, sqrt, tan, tanh,
//!            random/rand, randomInt/randInt
//! Properties: PI, E, SQRT2, SQRT1_2, LN2, LN10, LOG2E, LOG10E

use core::f64::consts;

use rand::Rng;

use crate::api::{Engine, Error, NativeCall, NativeResult};
use crate::values::Value;

// ============================================================================
// Basic Operations
// ============================================================================

/// Smaller of `a` and `b`; integers stay integers.
fn math_min(call: &mut NativeCall<'_>) -> NativeResult {
    pick(call, |a, b| a <= b)
}

/// Larger of `a` and `b`; integers stay integers.
fn math_max(call: &mut NativeCall<'_>) -> NativeResult {
    pick(call, |a, b| a >= b)
}

fn pick(call: &mut NativeCall<'_>, keep_a: fn(f64, f64) -> bool) -> NativeResult {
    let a = call.arg_value("a").cloned().unwrap_or_default();
    let b = call.arg_value("b").cloned().unwrap_or_default();
    let result = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(if keep_a(*x as f64, *y as f64) { *x } else { *y }),
        _ => {
            let (x, y) = (a.as_double(), b.as_double());
            Value::Double(if keep_a(x, y) { x } else { y })
        }
    };
    call.set_return(result);
    Ok(())
}

fn math_abs(call: &mut NativeCall<'_>) -> NativeResult {
    let result = match call.arg_value("a") {
        Some(Value::Int(value)) => Value::Int(value.wrapping_abs()),
        other => Value::Double(other.map_or(0.0, Value::as_double).abs()),
    };
    call.set_return(result);
    Ok(())
}

fn math_floor(call: &mut NativeCall<'_>) -> NativeResult {
    to_int(call, f64::floor)
}

fn math_ceil(call: &mut NativeCall<'_>) -> NativeResult {
    to_int(call, f64::ceil)
}

fn math_round(call: &mut NativeCall<'_>) -> NativeResult {
    to_int(call, f64::round)
}

fn to_int(call: &mut NativeCall<'_>, op: fn(f64) -> f64) -> NativeResult {
    let value = op(call.arg_double("a"));
    call.set_return(Value::Int(value as i32));
    Ok(())
}

// ============================================================================
// Floating Point Functions
// ============================================================================

fn unary(call: &mut NativeCall<'_>, op: fn(f64) -> f64) -> NativeResult {
    let value = op(call.arg_double("a"));
    call.set_return(Value::Double(value));
    Ok(())
}

fn binary(call: &mut NativeCall<'_>, op: fn(f64, f64) -> f64) -> NativeResult {
    let value = op(call.arg_double("a"), call.arg_double("b"));
    call.set_return(Value::Double(value));
    Ok(())
}

// ============================================================================
// Random Numbers
// ============================================================================

/// Uniform double in `[0, 1)`.
fn math_random(call: &mut NativeCall<'_>) -> NativeResult {
    let value: f64 = rand::thread_rng().r#gen();
    call.set_return(Value::Double(value));
    Ok(())
}

/// Uniform integer in `[min, max]`, bounds in either order.
fn math_random_int(call: &mut NativeCall<'_>) -> NativeResult {
    let (a, b) = (call.arg_int("min"), call.arg_int("max"));
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let value = rand::thread_rng().gen_range(lo..=hi);
    call.set_return(Value::Int(value));
    Ok(())
}

// ============================================================================
// Registration
// ============================================================================

const CONSTANTS: &[(&str, f64)] = &[
    ("Math.PI", consts::PI),
    ("Math.E", consts::E),
    ("Math.SQRT2", consts::SQRT_2),
    ("Math.SQRT1_2", consts::FRAC_1_SQRT_2),
    ("Math.LN2", consts::LN_2),
    ("Math.LN10", consts::LN_10),
    ("Math.LOG2E", consts::LOG2_E),
    ("Math.LOG10E", consts::LOG10_E),
];

const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("function Math.acos(a)", f64::acos),
    ("function Math.asin(a)", f64::asin),
    ("function Math.atan(a)", f64::atan),
    ("function Math.cos(a)", f64::cos),
    ("function Math.cosh(a)", f64::cosh),
    ("function Math.exp(a)", f64::exp),
    ("function Math.log(a)", f64::ln),
    ("function Math.sin(a)", f64::sin),
    ("function Math.sinh(a)", f64::sinh),
    ("function Math.sqrt(a)", f64::sqrt),
    ("function Math.tan(a)", f64::tan),
    ("function Math.tanh(a)", f64::tanh),
];

/// Register the `Math` namespace.
pub fn register_math(engine: &mut Engine) -> Result<(), Error> {
    engine.add_native("function Math.min(a, b)", math_min)?;
    engine.add_native("function Math.max(a, b)", math_max)?;
    engine.add_native("function Math.abs(a)", math_abs)?;
    engine.add_native("function Math.floor(a)", math_floor)?;
    engine.add_native("function Math.ceil(a)", math_ceil)?;
    engine.add_native("function Math.round(a)", math_round)?;

    for &(signature, op) in UNARY {
        engine.add_native(signature, move |call| unary(call, op))?;
    }
    engine.add_native("function Math.atan2(a, b)", |call| binary(call, f64::atan2))?;
    engine.add_native("function Math.pow(a, b)", |call| binary(call, f64::powf))?;

    engine.add_native("function Math.random()", math_random)?;
    engine.add_native("function Math.rand()", math_random)?;
    engine.add_native("function Math.randomInt(min, max)", math_random_int)?;
    engine.add_native("function Math.randInt(min, max)", math_random_int)?;

    for &(path, value) in CONSTANTS {
        engine.add_native_property(path, |call| {
            call.set_return(Value::Double(value));
            Ok(())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::api::{Engine, EngineOptions};
    use crate::values::Value;

    fn eval(source: &str) -> Value {
        let mut engine = Engine::new(EngineOptions::default());
        let id = engine
            .eval_complex(source)
            .unwrap_or_else(|e| panic!("evaluation should succeed for: {}\nError: {}", source, e));
        engine.heap().get(id).clone()
    }

    #[test]
    fn test_min_max_keep_integers() {
        assert!(matches!(eval("Math.min(3, 7)"), Value::Int(3)));
        assert!(matches!(eval("Math.max(3, 7)"), Value::Int(7)));
        assert_eq!(eval("Math.max(1.5, 1)").as_double(), 1.5);
    }

    #[test]
    fn test_rounding_returns_integers() {
        assert!(matches!(eval("Math.floor(2.7)"), Value::Int(2)));
        assert!(matches!(eval("Math.ceil(2.1)"), Value::Int(3)));
        assert!(matches!(eval("Math.round(2.5)"), Value::Int(3)));
    }

    #[test]
    fn test_abs() {
        assert_eq!(eval("Math.abs(-4)").as_int(), 4);
        assert_eq!(eval("Math.abs(-1.25)").as_double(), 1.25);
    }

    #[test]
    fn test_constants_and_functions() {
        assert!((eval("Math.PI").as_double() - core::f64::consts::PI).abs() < 1e-12);
        assert_eq!(eval("Math.pow(2, 10)").as_double(), 1024.0);
        assert_eq!(eval("Math.sqrt(16)").as_double(), 4.0);
    }

    #[test]
    fn test_random_int_stays_in_range() {
        for _ in 0..50 {
            let value = eval("Math.randInt(5, 1)").as_int();
            assert!((1..=5).contains(&value));
        }
        let value = eval("Math.random()").as_double();
        assert!((0.0..1.0).contains(&value));
    }
}
