//! Function payloads: script source bodies and host callbacks.
//!
//! Script functions keep the raw text of their body (`{ ... }`) and are
//! re-lexed on every call; their formal parameters are the function value's
//! children. Native functions wrap a host closure that runs against the
//! call's scope frame.

use alloc::rc::Rc;
use core::fmt;

use ecow::EcoString;

use crate::api::native::{NativeCall, NativeResult};

/// Signature of host callbacks.
///
/// The callback reads its arguments by name from the call scope, and
/// writes its result into the scope's `return` slot.
///
/// # Example
///
/// ```ignore
/// engine.add_native("function add(a, b)", |call| {
///     let sum = call.arg_int("a") + call.arg_int("b");
///     call.set_return(Value::Int(sum));
///     Ok(())
/// })?;
/// ```
pub type NativeFn = dyn Fn(&mut NativeCall<'_>) -> NativeResult;

/// A shared handle to a host callback.
#[derive(Clone)]
pub struct NativeFunction {
    callback: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new(callback: impl Fn(&mut NativeCall<'_>) -> NativeResult + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn call(&self, call: &mut NativeCall<'_>) -> NativeResult {
        (self.callback)(call)
    }

    /// Whether both handles point at the same closure.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFunction(..)")
    }
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    /// Unparsed body text, braces included.
    Script(EcoString),
    Native(NativeFunction),
}
