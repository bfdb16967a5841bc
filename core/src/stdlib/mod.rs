//! Sprig Standard Library
//!
//! Native functions registered on Root before user code runs:
//! - Global: `eval`, `exec`, `trace`, number parsing, `console`, `Integer`,
//!   `JSON` and `Object`
//! - Math: mathematical functions and constants
//! - String: methods on string values
//! - Array: methods on arrays
//!
//! Everything goes through the public [`Engine::add_native`] and
//! [`Engine::add_native_property`] surface, so hosts can register their own
//! packages the same way.

use crate::api::{Engine, Error};

pub mod array;
pub mod global;
pub mod math;
pub mod string;

pub use array::register_array;
pub use global::register_global;
pub use math::register_math;
pub use string::register_string;

#[cfg(test)]
mod array_test;
#[cfg(test)]
mod string_test;

/// Register every standard library package.
///
/// [`Engine::new`] calls this when [`EngineOptions::stdlib`] is set. To
/// pick packages individually, start from an engine without the standard
/// library and call `register_math` and friends directly.
///
/// # Example
///
/// ```ignore
/// let mut engine = Engine::new(EngineOptions { stdlib: false, ..Default::default() });
/// sprig_core::stdlib::register_math(&mut engine)?;
/// ```
///
/// [`EngineOptions::stdlib`]: crate::api::EngineOptions::stdlib
pub fn register_stdlib(engine: &mut Engine) -> Result<(), Error> {
    register_global(engine)?;
    register_math(engine)?;
    register_string(engine)?;
    register_array(engine)?;
    Ok(())
}
