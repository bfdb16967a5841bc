pub mod function;
pub mod heap;
pub mod ops;
pub mod text;
pub mod value;

pub use function::{FunctionBody, NativeFn, NativeFunction};
pub use heap::{ChildLink, Heap, LinkId, PROTOTYPE, RETURN, ValueId};
pub use ops::{maths_op, values_equal};
pub use value::{Kind, ScriptRegex, Value, format_double};
