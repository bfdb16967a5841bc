//! Sprig - an embeddable JavaScript-like scripting engine
//!
//! # Overview
//!
//! Sprig runs small scripts against a host application's data. The language
//! is a JavaScript subset: `var`/`const`, functions and closures, objects
//! and arrays with prototype lookup, `try`/`catch`/`finally`, `switch` and
//! regex literals. Parsing and evaluation happen in one pass; there is no
//! compile step.
//!
//! # Quick Start
//!
//! ```ignore
//! use sprig::{Engine, EngineOptions};
//!
//! let mut engine = Engine::new(EngineOptions::default());
//! engine.execute("var x = 10; var y = 20; var result = x + y;")?;
//! assert_eq!(engine.get_int("result"), Some(30));
//! ```
//!
//! # Host Functions
//!
//! Bind Rust closures behind a script signature. Arguments are read by
//! parameter name and the result goes in the call's return slot:
//!
//! ```ignore
//! use sprig::{Engine, Value};
//!
//! let mut engine = Engine::default();
//! engine.add_native("function host.greet(name)", |call| {
//!     let text = format!("hello {}", call.arg_string("name"));
//!     call.set_return(Value::string(text));
//!     Ok(())
//! })?;
//! engine.execute("var msg = host.greet(\"sprig\");")?;
//! ```
//!
//! # Errors
//!
//! Failed scripts return an [`Error`] carrying a [`Diagnostic`]; render it
//! with [`render_error`] or [`render_error_to_string`].

// Re-export public API from sprig_core
pub use sprig_core::api::{
    Console, Diagnostic, Engine, EngineOptions, Error, ExecutionOptions, MemoryConsole,
    NativeCall, NativeResult, Severity, StdConsole,
};

// Re-export commonly used values
pub use sprig_core::snapshot::Snapshot;
pub use sprig_core::values::{self, Heap, Value, ValueId};
pub use sprig_core::stdlib;

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
