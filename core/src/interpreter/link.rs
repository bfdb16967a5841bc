//! Named handles to values flowing through expression evaluation.

use ecow::EcoString;

use crate::values::{LinkId, ValueId};

/// Where a [`Link`] writes when it is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// An intermediate result; assignment only repoints the handle.
    Detached,
    /// A child slot of `parent`; assignment rewrites the slot in the heap.
    Child { parent: ValueId, link: LinkId },
}

/// A name bound to a value, as produced by every grammar production.
///
/// Links do not own their value. The interpreter holds a reference to every
/// value a link points at until the enclosing statement finishes.
#[derive(Debug, Clone)]
pub struct Link {
    pub name: EcoString,
    pub value: ValueId,
    pub slot: Slot,
    pub read_only: bool,
}

impl Link {
    pub fn detached(value: ValueId) -> Self {
        Self::named(EcoString::new(), value)
    }

    pub fn named(name: impl Into<EcoString>, value: ValueId) -> Self {
        Self {
            name: name.into(),
            value,
            slot: Slot::Detached,
            read_only: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.slot, Slot::Child { .. })
    }
}
