//! Output sink behind `console.log` and friends.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::{String, Vec};

/// Where script console output goes.
pub trait Console {
    fn log(&mut self, text: &str);

    fn error(&mut self, text: &str);

    fn clear(&mut self) {}
}

/// Writes `log` to stdout and `error` to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn log(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, text: &str) {
        eprintln!("{}", text);
    }
}

/// Collects output in memory; clones share the same buffer.
///
/// Errors are recorded with an `error: ` prefix so tests can tell the two
/// streams apart.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Console for MemoryConsole {
    fn log(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.into());
    }

    fn error(&mut self, text: &str) {
        self.lines.borrow_mut().push(crate::format!("error: {}", text));
    }

    fn clear(&mut self) {
        self.lines.borrow_mut().clear();
    }
}
