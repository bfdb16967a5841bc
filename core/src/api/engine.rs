//! The Sprig scripting engine.

use super::console::Console;
use super::native::{NativeCall, NativeResult};
use super::{EngineOptions, Error};
use crate::interpreter::{Interpreter, Interrupt};
use crate::snapshot::{self, Snapshot};
use crate::values::{FunctionBody, Heap, NativeFunction, Value, ValueId, text};
use crate::{Box, String, Vec, format, stdlib};

/// An embeddable script engine.
///
/// The engine owns the global Root object and every value reachable from
/// it. Scripts run synchronously on the calling thread; natives may call
/// back into the engine through [`NativeCall`].
///
/// # Example
///
/// ```ignore
/// use sprig_core::api::{Engine, EngineOptions};
/// use sprig_core::values::Value;
///
/// let mut engine = Engine::new(EngineOptions::default());
///
/// engine.add_native("function host.add(a, b)", |call| {
///     let sum = call.arg_int("a") + call.arg_int("b");
///     call.set_return(Value::Int(sum));
///     Ok(())
/// })?;
///
/// engine.execute("var result = host.add(40, 2);")?;
/// assert_eq!(engine.get_int("result"), Some(42));
/// ```
pub struct Engine {
    interp: Interpreter,
    options: EngineOptions,
}

impl Engine {
    /// Create an engine, registering the standard library when
    /// `options.stdlib` is set.
    pub fn new(options: EngineOptions) -> Self {
        let mut engine = Self {
            interp: Interpreter::new(options.execution.clone()),
            options,
        };
        if engine.options.stdlib {
            if let Err(err) = stdlib::register_stdlib(&mut engine) {
                tracing::error!(%err, "failed to register the standard library");
            }
        }
        engine
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run a script to completion or to its first uncaught error.
    ///
    /// Statements before the error keep their effects.
    pub fn execute(&mut self, code: &str) -> Result<(), Error> {
        tracing::debug!(bytes = code.len(), "execute");
        let result = self.interp.execute(code);
        result.map_err(|interrupt| self.report(interrupt))
    }

    /// Evaluate `;`-separated expressions and return the last result.
    ///
    /// The handle stays valid until the next call into the engine that
    /// runs script code.
    pub fn eval_complex(&mut self, code: &str) -> Result<ValueId, Error> {
        tracing::debug!(bytes = code.len(), "eval_complex");
        let result = self.interp.eval_complex(code);
        result.map_err(|interrupt| self.report(interrupt))
    }

    fn report(&mut self, interrupt: Interrupt) -> Error {
        let error = self.interp.into_error(interrupt);
        let scope_dump = self.interp.take_scope_dump();
        tracing::error!(
            line = error.line,
            column = error.column,
            scopes = ?scope_dump,
            "{}",
            error.message()
        );
        Error::from_script(error, scope_dump)
    }

    // ========================================================================
    // Host functions
    // ========================================================================

    /// Register a native function from a signature such as
    /// `"function Math.clamp(value, lo, hi)"`.
    ///
    /// Namespace objects along the path are created as needed. The callback
    /// reads its arguments by parameter name.
    pub fn add_native(
        &mut self,
        signature: &str,
        callback: impl Fn(&mut NativeCall<'_>) -> NativeResult + 'static,
    ) -> Result<(), Error> {
        let result = self.interp.add_native(signature, NativeFunction::new(callback));
        result.map_err(|interrupt| match interrupt {
            Interrupt::Error(error) => Error::Api(format!(
                "invalid native signature '{}': {}",
                signature,
                error.message()
            )),
            Interrupt::Throw(_) => Error::Api(format!("invalid native signature '{}'", signature)),
        })
    }

    /// Store a property computed once, now, by `callback`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.add_native_property("Math.PI", |call| {
    ///     call.set_return(Value::Double(core::f64::consts::PI));
    ///     Ok(())
    /// })?;
    /// ```
    pub fn add_native_property(
        &mut self,
        path: &str,
        callback: impl FnOnce(&mut NativeCall<'_>) -> NativeResult,
    ) -> Result<(), Error> {
        let result = self.interp.add_native_property(path, callback);
        result.map_err(|interrupt| self.report(interrupt))
    }

    /// Send `console.*` output somewhere other than stdout/stderr.
    pub fn set_console(&mut self, console: impl Console + 'static) {
        self.interp.console = Box::new(console);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn root(&self) -> ValueId {
        self.interp.root
    }

    pub fn heap(&self) -> &Heap {
        &self.interp.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.interp.heap
    }

    /// Resolve a dotted path from Root.
    pub fn lookup(&self, path: &str) -> Option<ValueId> {
        self.interp.lookup(path)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.lookup(path).map(|id| self.interp.heap.get(id))
    }

    pub fn get_int(&self, path: &str) -> Option<i32> {
        self.get(path).filter(|value| value.is_numeric()).map(Value::as_int)
    }

    pub fn get_double(&self, path: &str) -> Option<f64> {
        self.get(path).filter(|value| value.is_numeric()).map(Value::as_double)
    }

    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).map(Value::to_display_string)
    }

    pub fn to_json(&self, id: ValueId) -> String {
        text::to_json(&self.interp.heap, id)
    }

    /// Indented dump of everything reachable from Root.
    pub fn trace(&self) -> String {
        text::trace(&self.interp.heap, self.interp.root, "root")
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn save_state(&self) -> Result<Snapshot, Error> {
        snapshot::save(&self.interp.heap, self.interp.root)
    }

    /// Replace Root with a saved graph.
    ///
    /// Every native function in the snapshot must already be registered on
    /// this engine at the same path. On error the engine is left untouched.
    pub fn restore_state(&mut self, snapshot: &Snapshot) -> Result<(), Error> {
        let natives: Vec<(&str, Value)> = snapshot
            .native_function_names
            .iter()
            .filter_map(|path| Some((path.as_str(), self.registered_native(path)?)))
            .collect();
        let resolve = |path: &str| {
            natives
                .iter()
                .find(|(name, _)| *name == path)
                .map(|(_, value)| value.clone())
        };

        let root = snapshot::load(&mut self.interp.heap, snapshot, &resolve)?;
        self.interp.replace_root(root);
        tracing::debug!(natives = natives.len(), "restored state");
        Ok(())
    }

    fn registered_native(&self, path: &str) -> Option<Value> {
        match self.get(path)? {
            Value::Function(FunctionBody::Native(native)) => Some(Value::native(native.clone())),
            _ => None,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
