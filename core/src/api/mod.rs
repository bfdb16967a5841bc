//! Public API for the Sprig scripting engine.
//!
//! [`Engine`] runs scripts against a persistent global object (Root),
//! registers host callbacks and reads results back out:
//!
//! 1. **Scripts**: [`Engine::execute`] runs statements, [`Engine::eval_complex`]
//!    evaluates expressions and returns the last value.
//! 2. **Host functions**: [`Engine::add_native`] binds a closure behind a
//!    `function path.name(args)` signature; the closure receives a
//!    [`NativeCall`].
//! 3. **State**: [`Engine::save_state`] and [`Engine::restore_state`] move
//!    Root through a binary [`Snapshot`](crate::snapshot::Snapshot).
//!
//! # Example
//!
//! ```ignore
//! use sprig_core::api::{Engine, EngineOptions};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! engine.execute("var x = 10; var y = 20; var result = x + y;")?;
//! assert_eq!(engine.get_int("result"), Some(30));
//! ```

pub mod console;
pub mod engine;
pub mod error;
pub mod native;
pub mod options;

pub use console::{Console, MemoryConsole, StdConsole};
pub use engine::Engine;
pub use error::{Diagnostic, Error, Severity};
pub use native::{NativeCall, NativeResult};
pub use options::{EngineOptions, ExecutionOptions};
