//! Fused recursive-descent parser and evaluator.
//!
//! There is no syntax tree. Each grammar production reads tokens from the
//! current lexer and, depending on its [`Mode`], either evaluates as it
//! goes or only consumes the tokens. Loops and `try` blocks re-run by
//! replaying captured source spans ([`replay`]); script functions keep their
//! body text and re-lex it on every call.
//!
//! Grammar levels, lowest precedence first:
//!
//! ```text
//! statement → base (assignment) → ternary → logic → condition
//!           → shift → expression (+ - ++ --) → term (* / %)
//!           → unary (! typeof) → factor
//! ```
//!
//! ## Value lifetimes
//!
//! Every value a [`Link`] points at is retained on the interpreter's
//! temporary stack when the link is made, and released when the statement
//! that made it finishes. Scope frames are retained while on the scope
//! stack. Root and the built-in class objects are retained for the life of
//! the interpreter.

mod call;
pub mod error;
mod expression;
mod factor;
mod host;
pub mod link;
pub mod mode;
pub mod replay;
mod stack;
mod statement;


pub use error::{Interrupt, Thrown};
pub use link::{Link, Slot};
pub use mode::Mode;

use ecow::EcoString;

use crate::api::console::{Console, StdConsole};
use crate::api::options::ExecutionOptions;
use crate::errors::{ErrorKind, ScriptError};
use crate::lexer::{Lexer, Token};
use crate::values::{Heap, LinkId, PROTOTYPE, Value, ValueId, maths_op, text};
use crate::{Box, String, Vec, format};

/// Names of the built-in class objects on Root.
pub const STRING_CLASS: &str = "String";
pub const OBJECT_CLASS: &str = "Object";
pub const ARRAY_CLASS: &str = "Array";

/// Upper bound on `prototype` hops during member lookup.
const MAX_PROTOTYPE_HOPS: usize = 64;

/// Class objects consulted at the end of member lookup.
#[derive(Debug, Clone, Copy)]
pub struct Classes {
    pub string: ValueId,
    pub object: ValueId,
    pub array: ValueId,
}

/// One frame of the scope stack.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub value: ValueId,
    /// Catch frames only hold the caught value; `var` skips past them.
    pub catch: bool,
}

pub struct Interpreter {
    pub(crate) heap: Heap,
    pub(crate) root: ValueId,
    pub(crate) classes: Classes,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) lexer: Lexer,
    pub(crate) options: ExecutionOptions,
    pub(crate) console: Box<dyn Console>,
    temps: Vec<ValueId>,
    depth: usize,
    sessions: usize,
    scope_dump: Option<Vec<String>>,
}

impl Interpreter {
    pub fn new(options: ExecutionOptions) -> Self {
        let mut heap = Heap::new();
        let root = heap.alloc(Value::Object);
        heap.retain(root);
        let mut class = |name: &str| {
            let id = heap.alloc(Value::Object);
            heap.retain(id);
            heap.add_child(root, name, id);
            id
        };
        let classes = Classes {
            string: class(STRING_CLASS),
            object: class(OBJECT_CLASS),
            array: class(ARRAY_CLASS),
        };
        Self {
            heap,
            root,
            classes,
            scopes: Vec::new(),
            lexer: Lexer::empty(),
            options,
            console: Box::new(StdConsole),
            temps: Vec::new(),
            depth: 0,
            sessions: 0,
            scope_dump: None,
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Run a sequence of statements.
    pub fn execute(&mut self, code: &str) -> Result<(), Interrupt> {
        self.begin_top_level();
        let lexer = Lexer::new(code)?;
        self.with_session(lexer, |it| {
            while it.lexer.token != Token::Eof {
                let mut mode = Mode::Evaluate;
                it.statement(&mut mode)?;
            }
            Ok(())
        })
    }

    /// Evaluate `;`-separated expressions and return the last result.
    ///
    /// The result stays alive until the statement that called this ends,
    /// or, at top level, until the next top-level call.
    pub fn eval_complex(&mut self, code: &str) -> Result<ValueId, Interrupt> {
        self.begin_top_level();
        let lexer = Lexer::new(code)?;
        self.with_session(lexer, |it| {
            let mut mode = Mode::Evaluate;
            loop {
                let last = it.base(&mut mode)?;
                if it.lexer.token != Token::Eof {
                    it.lexer.match_token(Token::Char(';'))?;
                }
                if it.lexer.token == Token::Eof {
                    return Ok(last.value);
                }
            }
        })
    }

    fn begin_top_level(&mut self) {
        if self.sessions == 0 {
            self.release_temps(0);
            self.scope_dump = None;
            self.depth = 0;
        }
    }

    /// Run `f` against a fresh scope stack holding only Root, restoring the
    /// caller's lexer, scopes and call depth afterwards.
    ///
    /// A fatal error raised inside a call carries the dump its frame took
    /// while unwinding; one raised at this level is dumped here.
    fn with_session<T>(
        &mut self,
        lexer: Lexer,
        f: impl FnOnce(&mut Self) -> Result<T, Interrupt>,
    ) -> Result<T, Interrupt> {
        self.heap.retain(self.root);
        let outer_scopes = core::mem::replace(
            &mut self.scopes,
            vec![Scope {
                value: self.root,
                catch: false,
            }],
        );
        let outer_depth = self.depth;
        self.sessions += 1;

        let result = self.with_lexer(lexer, f);

        let dump = match &result {
            Err(Interrupt::Error(_)) => self.scope_dump.is_none(),
            Err(Interrupt::Throw(_)) => self.sessions == 1,
            Ok(_) => false,
        };
        if dump {
            self.scope_dump = Some(self.dump_scopes());
        }
        self.sessions -= 1;
        self.depth = outer_depth;
        let inner_scopes = core::mem::replace(&mut self.scopes, outer_scopes);
        for scope in inner_scopes.into_iter().rev() {
            self.heap.release(scope.value);
        }
        result
    }

    /// Record the scope stack for a fatal error unwinding past the innermost
    /// frame. Only the first frame to see the error records it.
    pub(crate) fn record_scope_dump(&mut self) {
        if self.scope_dump.is_none() {
            self.scope_dump = Some(self.dump_scopes());
        }
    }

    pub(crate) fn clear_scope_dump(&mut self) {
        self.scope_dump = None;
    }

    /// The scope stack at the most recent fatal error, outermost first.
    pub fn take_scope_dump(&mut self) -> Vec<String> {
        self.scope_dump.take().unwrap_or_default()
    }

    pub fn dump_scopes(&self) -> Vec<String> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| {
                let value = self.heap.get(scope.value);
                format!("{}: {} , {}", i, text::kind_flags(value), value)
            })
            .collect()
    }

    /// Drop every temporary reference. Handles returned by an earlier
    /// top-level [`Interpreter::eval_complex`] become invalid.
    pub fn release_all_temps(&mut self) {
        self.release_temps(0);
    }

    // ========================================================================
    // Temporaries
    // ========================================================================

    /// Keep `id` alive until the current statement ends.
    pub(crate) fn hold(&mut self, id: ValueId) -> ValueId {
        self.heap.retain(id);
        self.temps.push(id);
        id
    }

    pub(crate) fn alloc_held(&mut self, value: Value) -> ValueId {
        let id = self.heap.alloc(value);
        self.hold(id)
    }

    pub(crate) fn temps_mark(&self) -> usize {
        self.temps.len()
    }

    pub(crate) fn release_temps(&mut self, mark: usize) {
        while self.temps.len() > mark {
            if let Some(id) = self.temps.pop() {
                self.heap.release(id);
            }
        }
    }

    // ========================================================================
    // Links
    // ========================================================================

    pub(crate) fn detached(&mut self, value: Value) -> Link {
        Link::detached(self.alloc_held(value))
    }

    pub(crate) fn undefined_link(&mut self) -> Link {
        self.detached(Value::Undefined)
    }

    /// A link to the child `name` of `parent`, if there is one.
    pub(crate) fn child_link(&mut self, parent: ValueId, name: &str) -> Option<Link> {
        let id = self.heap.find_child(parent, name)?.id;
        self.attached(parent, id)
    }

    /// The child `name` of `parent`, created as undefined if absent.
    pub(crate) fn child_link_or_create(&mut self, parent: ValueId, name: &str) -> Option<Link> {
        let id = self.heap.find_child_or_create(parent, name);
        self.attached(parent, id)
    }

    fn attached(&mut self, parent: ValueId, id: LinkId) -> Option<Link> {
        let child = self.heap.child_link(parent, id)?;
        let link = Link {
            name: child.name.clone(),
            value: child.value,
            slot: Slot::Child { parent, link: id },
            read_only: child.read_only,
        };
        self.hold(link.value);
        Some(link)
    }

    /// Point `link` at `value`, rewriting the heap slot when it is attached.
    pub(crate) fn replace_link(&mut self, link: &mut Link, value: ValueId) {
        self.hold(value);
        if let Slot::Child { parent, link: id } = link.slot {
            if !self.heap.replace_child(parent, id, value) {
                link.slot = Slot::Detached;
            }
        }
        link.value = value;
    }

    pub(crate) fn truthy(&self, link: &Link) -> bool {
        self.heap.get(link.value).as_bool()
    }

    /// Apply a binary operator, located at the current token on failure.
    pub(crate) fn maths(&mut self, a: &Link, b: &Link, op: Token) -> Result<Link, Interrupt> {
        let value = maths_op(&self.heap, a.value, b.value, op).map_err(|kind| self.fail(kind))?;
        Ok(self.detached(value))
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Search the scope stack from the innermost frame outwards.
    pub(crate) fn find_in_scopes(&mut self, name: &str) -> Option<Link> {
        let frame = self
            .scopes
            .iter()
            .rev()
            .map(|scope| scope.value)
            .find(|&frame| self.heap.find_child(frame, name).is_some())?;
        self.child_link(frame, name)
    }

    /// The frame `var`, `const` and function declarations bind into.
    pub(crate) fn declaration_scope(&self) -> ValueId {
        self.scopes
            .iter()
            .rev()
            .find(|scope| !scope.catch)
            .map(|scope| scope.value)
            .unwrap_or(self.root)
    }

    pub(crate) fn push_scope(&mut self, value: ValueId, catch: bool) {
        self.heap.retain(value);
        self.scopes.push(Scope { value, catch });
    }

    pub(crate) fn pop_scope(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            self.heap.release(scope.value);
        }
    }

    /// Look `name` up along the `prototype` chain of `object`, then in the
    /// built-in class matching its kind, then in `Object`.
    pub(crate) fn find_in_classes(&mut self, object: ValueId, name: &str) -> Option<Link> {
        let mut class = self.heap.find_child(object, PROTOTYPE).map(|l| l.value);
        for _ in 0..MAX_PROTOTYPE_HOPS {
            let Some(current) = class else { break };
            if !self.heap.contains(current) {
                break;
            }
            if self.heap.find_child(current, name).is_some() {
                return self.child_link(current, name);
            }
            class = self.heap.find_child(current, PROTOTYPE).map(|l| l.value);
        }

        let value = self.heap.get(object);
        let builtin = if value.is_string() {
            Some(self.classes.string)
        } else if value.is_array() {
            Some(self.classes.array)
        } else {
            None
        };
        if let Some(link) = builtin.and_then(|class| self.child_link(class, name)) {
            return Some(link);
        }
        self.child_link(self.classes.object, name)
    }

    /// Make `root` the global object, dropping the previous graph.
    pub(crate) fn replace_root(&mut self, root: ValueId) {
        self.release_temps(0);
        self.heap.retain(root);
        let previous = core::mem::replace(&mut self.root, root);
        self.resolve_classes();
        self.heap.release(previous);
    }

    /// Re-read the class objects from Root.
    fn resolve_classes(&mut self) {
        let previous = self.classes;
        self.classes = Classes {
            string: self.resolve_class(STRING_CLASS),
            object: self.resolve_class(OBJECT_CLASS),
            array: self.resolve_class(ARRAY_CLASS),
        };
        self.heap.release(previous.string);
        self.heap.release(previous.object);
        self.heap.release(previous.array);
    }

    fn resolve_class(&mut self, name: &str) -> ValueId {
        let id = match self.heap.find_child(self.root, name) {
            Some(link) => link.value,
            None => {
                let id = self.heap.alloc(Value::Object);
                self.heap.add_child(self.root, name, id);
                id
            }
        };
        self.heap.retain(id);
        id
    }

    // ========================================================================
    // Failures
    // ========================================================================

    /// A fatal error located at the current token.
    pub(crate) fn fail(&self, kind: ErrorKind) -> Interrupt {
        Interrupt::from(self.lexer.error(kind))
    }

    /// Throw a fresh script value from the current token.
    pub(crate) fn throw_value(&mut self, value: Value) -> Interrupt {
        let id = self.heap.alloc(value);
        self.throw_id(id)
    }

    /// Throw an existing value, taking a reference on it for the throw.
    pub(crate) fn throw_id(&mut self, id: ValueId) -> Interrupt {
        self.heap.retain(id);
        let description = self.describe(id);
        let origin = self.lexer.error(ErrorKind::UncaughtThrow { description });
        Interrupt::Throw(Thrown {
            value: id,
            origin: Box::new(origin),
        })
    }

    /// Release whatever an interrupt holds and turn it into a plain error.
    pub(crate) fn into_error(&mut self, interrupt: Interrupt) -> ScriptError {
        match interrupt {
            Interrupt::Error(error) => *error,
            Interrupt::Throw(thrown) => {
                self.heap.release(thrown.value);
                *thrown.origin
            }
        }
    }

    /// Short text for a value in messages.
    pub(crate) fn describe(&self, id: ValueId) -> String {
        match self.heap.get(id) {
            Value::Object | Value::Array => text::to_json(&self.heap, id),
            other => other.to_display_string(),
        }
    }

    // ========================================================================
    // Paths
    // ========================================================================

    /// Resolve a dotted path from Root.
    pub fn lookup(&self, path: &str) -> Option<ValueId> {
        path.split('.').try_fold(self.root, |node, segment| {
            self.heap.find_child(node, segment).map(|link| link.value)
        })
    }

    /// Walk a dotted path from Root, creating missing segments as objects.
    /// Returns the parent of the last segment and the last segment.
    pub(crate) fn vivify_parent<'p>(&mut self, path: &'p str) -> (ValueId, &'p str) {
        let (namespace, name) = match path.rsplit_once('.') {
            Some((namespace, name)) => (Some(namespace), name),
            None => (None, path),
        };
        let mut node = self.root;
        for segment in namespace.into_iter().flat_map(|ns| ns.split('.')) {
            node = match self.heap.find_child(node, segment) {
                Some(link) => link.value,
                None => {
                    let child = self.heap.alloc(Value::Object);
                    self.heap.add_child(node, segment, child);
                    child
                }
            };
        }
        (node, name)
    }

    pub(crate) fn name_of(&self, link: &Link) -> EcoString {
        if link.name.is_empty() {
            "(anonymous)".into()
        } else {
            link.name.clone()
        }
    }
}
