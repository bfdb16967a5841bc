//! The context a host callback runs in.

use crate::api::console::Console;
use crate::errors::ErrorKind;
use crate::interpreter::{Interpreter, Interrupt};
use crate::values::{Heap, RETURN, Value, ValueId, text};
use crate::{String, ToString};

/// Result of a host callback. `Err` unwinds the script like a script error
/// or a `throw`, see [`NativeCall::error`] and [`NativeCall::throw`].
pub type NativeResult = Result<(), Interrupt>;

/// Handed to native functions while they run.
///
/// Arguments are the children of the call's scope frame, named after the
/// formal parameters of the registered signature. Missing arguments read
/// as undefined.
pub struct NativeCall<'a> {
    interp: &'a mut Interpreter,
    scope: ValueId,
}

impl<'a> NativeCall<'a> {
    pub(crate) fn new(interp: &'a mut Interpreter, scope: ValueId) -> Self {
        Self { interp, scope }
    }

    /// The call's scope frame.
    pub fn scope(&self) -> ValueId {
        self.scope
    }

    pub fn arg(&self, name: &str) -> Option<ValueId> {
        self.interp.heap.find_child(self.scope, name).map(|link| link.value)
    }

    /// The argument's payload, if it was bound.
    pub fn arg_value(&self, name: &str) -> Option<&Value> {
        self.arg(name).map(|id| self.interp.heap.get(id))
    }

    pub fn arg_int(&self, name: &str) -> i32 {
        self.arg_value(name).map_or(0, Value::as_int)
    }

    pub fn arg_double(&self, name: &str) -> f64 {
        self.arg_value(name).map_or(0.0, Value::as_double)
    }

    pub fn arg_bool(&self, name: &str) -> bool {
        self.arg_value(name).is_some_and(Value::as_bool)
    }

    /// The argument as text; undefined arguments give `"undefined"`.
    pub fn arg_string(&self, name: &str) -> String {
        self.arg_value(name)
            .map_or_else(|| "undefined".to_string(), Value::to_display_string)
    }

    /// The receiver when called as `object.method()`.
    pub fn this(&self) -> Option<ValueId> {
        self.arg("this")
    }

    /// Store a fresh value as the call's result.
    pub fn set_return(&mut self, value: Value) -> ValueId {
        let id = self.interp.heap.alloc(value);
        self.set_return_id(id);
        id
    }

    /// Make an existing value the call's result.
    pub fn set_return_id(&mut self, id: ValueId) {
        let heap = &mut self.interp.heap;
        match heap.find_child(self.scope, RETURN).map(|link| link.id) {
            Some(link) => {
                heap.replace_child(self.scope, link, id);
            }
            None => {
                heap.add_child(self.scope, RETURN, id);
            }
        }
    }

    pub fn return_value(&self) -> Option<ValueId> {
        self.arg(RETURN)
    }

    pub fn heap(&self) -> &Heap {
        &self.interp.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.interp.heap
    }

    pub fn root(&self) -> ValueId {
        self.interp.root
    }

    /// Resolve a dotted path from Root.
    pub fn lookup(&self, path: &str) -> Option<ValueId> {
        self.interp.lookup(path)
    }

    /// Evaluate expressions against Root; the result lives until the
    /// calling statement ends.
    pub fn eval_complex(&mut self, code: &str) -> Result<ValueId, Interrupt> {
        self.interp.eval_complex(code)
    }

    pub fn execute(&mut self, code: &str) -> NativeResult {
        self.interp.execute(code)
    }

    /// A fatal error reported at the call site.
    pub fn error(&self, message: impl Into<String>) -> Interrupt {
        self.interp.fail(ErrorKind::Native(message.into()))
    }

    /// A catchable script exception carrying `value`.
    pub fn throw(&mut self, value: Value) -> Interrupt {
        self.interp.throw_value(value)
    }

    pub fn console(&mut self) -> &mut dyn Console {
        self.interp.console.as_mut()
    }

    pub fn to_json(&self, id: ValueId) -> String {
        text::to_json(&self.interp.heap, id)
    }

    /// Indented dump of `id` and everything below it.
    pub fn trace(&self, id: ValueId, name: &str) -> String {
        text::trace(&self.interp.heap, id, name)
    }
}
