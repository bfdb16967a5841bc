//! Reference-counted value graph stored in a generational arena.
//!
//! Every runtime datum is a node in [`Heap`], addressed by a [`ValueId`]
//! (slot index plus generation). A node owns an ordered list of named
//! [`ChildLink`]s; each owning link holds one reference on its target.
//! Other holders (the engine's root, scope frames on the stack, in-flight
//! expression results) take references with [`Heap::retain`] and give them
//! back with [`Heap::release`]. When a count reaches zero the node is freed
//! and its owned children are released in turn.
//!
//! Links created by `new` to a class object are non-owning: they never
//! touch the target's count, and a freed target is detected through the
//! generation check instead of being kept alive.
//!
//! Releasing a node whose count is already zero, or touching a freed
//! handle, is an interpreter bug and panics.

use core::cell::Cell;
use std::collections::HashMap;

use ecow::EcoString;

use super::value::{Kind, Value};
use crate::Vec;

/// Name of the child that links an object to its class.
pub const PROTOTYPE: &str = "prototype";
/// Name of the slot a function call writes its result into.
pub const RETURN: &str = "return";

/// Handle to a heap node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId {
    index: u32,
    generation: u32,
}

/// Stable identity of a child link within the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(u32);

/// A named slot in a node's child list.
#[derive(Debug, Clone)]
pub struct ChildLink {
    pub id: LinkId,
    pub name: EcoString,
    pub value: ValueId,
    pub read_only: bool,
    /// Owning links hold a reference on `value`.
    pub owning: bool,
}

#[derive(Debug)]
struct Node {
    refs: u32,
    value: Value,
    children: Vec<ChildLink>,
    array_len: Cell<Option<i32>>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_link: u32,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with no references. The caller must retain it or
    /// attach it as a child.
    pub fn alloc(&mut self, value: Value) -> ValueId {
        let node = Node {
            refs: 0,
            value,
            children: Vec::new(),
            array_len: Cell::new(None),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                ValueId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ValueId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Whether `id` still refers to a live node.
    pub fn contains(&self, id: ValueId) -> bool {
        self.try_node(id).is_some()
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn refs(&self, id: ValueId) -> u32 {
        self.node(id).refs
    }

    pub fn retain(&mut self, id: ValueId) {
        self.node_mut(id).refs += 1;
    }

    pub fn release(&mut self, id: ValueId) {
        let node = self.node_mut(id);
        if node.refs == 0 {
            panic!("No refs to unref: {:?}", id);
        }
        node.refs -= 1;
        if node.refs == 0 {
            self.free_from(id);
        }
    }

    fn free_from(&mut self, id: ValueId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let slot = &mut self.slots[id.index as usize];
            let Some(node) = slot.node.take() else {
                panic!("stale value handle {:?}", id);
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            for link in node.children {
                if !link.owning {
                    continue;
                }
                let child = self.node_mut(link.value);
                if child.refs == 0 {
                    panic!("No refs to unref: {:?}", link.value);
                }
                child.refs -= 1;
                if child.refs == 0 {
                    pending.push(link.value);
                }
            }
        }
    }

    fn try_node(&self, id: ValueId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn try_node_mut(&mut self, id: ValueId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn node(&self, id: ValueId) -> &Node {
        match self.try_node(id) {
            Some(node) => node,
            None => panic!("stale value handle {:?}", id),
        }
    }

    fn node_mut(&mut self, id: ValueId) -> &mut Node {
        match self.try_node_mut(id) {
            Some(node) => node,
            None => panic!("stale value handle {:?}", id),
        }
    }

    // ========================================================================
    // Payload
    // ========================================================================

    pub fn get(&self, id: ValueId) -> &Value {
        &self.node(id).value
    }

    pub fn try_get(&self, id: ValueId) -> Option<&Value> {
        self.try_node(id).map(|node| &node.value)
    }

    /// Overwrite the payload, keeping the children.
    pub fn set(&mut self, id: ValueId, value: Value) {
        self.node_mut(id).value = value;
    }

    pub fn kind(&self, id: ValueId) -> Kind {
        self.get(id).kind()
    }

    /// A basic value has no children and is copied into call frames.
    pub fn is_basic(&self, id: ValueId) -> bool {
        self.node(id).children.is_empty()
    }

    // ========================================================================
    // Children
    // ========================================================================

    pub fn children(&self, id: ValueId) -> &[ChildLink] {
        &self.node(id).children
    }

    pub fn find_child(&self, id: ValueId, name: &str) -> Option<&ChildLink> {
        self.node(id).children.iter().find(|link| link.name == name)
    }

    pub fn child_link(&self, id: ValueId, link: LinkId) -> Option<&ChildLink> {
        self.try_node(id)?
            .children
            .iter()
            .find(|child| child.id == link)
    }

    /// Append an owning child. An undefined receiver becomes an object.
    pub fn add_child(&mut self, parent: ValueId, name: impl Into<EcoString>, value: ValueId) -> LinkId {
        self.push_child(parent, name.into(), value, false, true)
    }

    pub fn add_const_child(
        &mut self,
        parent: ValueId,
        name: impl Into<EcoString>,
        value: ValueId,
    ) -> LinkId {
        self.push_child(parent, name.into(), value, true, true)
    }

    /// Link `object` to `class` without taking a reference on `class`.
    pub fn add_prototype_link(&mut self, object: ValueId, class: ValueId) -> LinkId {
        self.push_child(object, PROTOTYPE.into(), class, false, false)
    }

    fn push_child(
        &mut self,
        parent: ValueId,
        name: EcoString,
        value: ValueId,
        read_only: bool,
        owning: bool,
    ) -> LinkId {
        if owning {
            self.retain(value);
        }
        let id = LinkId(self.next_link);
        self.next_link = self.next_link.wrapping_add(1);
        let node = self.node_mut(parent);
        if node.value.is_undefined() {
            node.value = Value::Object;
        }
        node.children.push(ChildLink {
            id,
            name,
            value,
            read_only,
            owning,
        });
        node.array_len.set(None);
        id
    }

    /// Add a child, or repoint the existing child of the same name.
    pub fn add_child_no_dup(&mut self, parent: ValueId, name: &str, value: ValueId) -> LinkId {
        match self.find_child(parent, name).map(|link| link.id) {
            Some(link) => {
                self.replace_child(parent, link, value);
                link
            }
            None => self.add_child(parent, name, value),
        }
    }

    /// Find a child by name, creating an undefined one if absent.
    pub fn find_child_or_create(&mut self, parent: ValueId, name: &str) -> LinkId {
        if let Some(link) = self.find_child(parent, name) {
            return link.id;
        }
        let value = self.alloc(Value::Undefined);
        self.add_child(parent, name, value)
    }

    /// Repoint a child link. The new target is retained before the old one
    /// is released, so replacing a link with its own target is safe.
    ///
    /// Returns `false` if the parent or the link no longer exists.
    pub fn replace_child(&mut self, parent: ValueId, link: LinkId, value: ValueId) -> bool {
        let Some(node) = self.try_node_mut(parent) else {
            return false;
        };
        let Some(child) = node.children.iter_mut().find(|child| child.id == link) else {
            return false;
        };
        let old = child.value;
        let owning = child.owning;
        child.value = value;
        if owning {
            self.retain(value);
            self.release(old);
        }
        true
    }

    pub fn set_read_only(&mut self, parent: ValueId, link: LinkId, read_only: bool) {
        if let Some(child) = self
            .node_mut(parent)
            .children
            .iter_mut()
            .find(|child| child.id == link)
        {
            child.read_only = read_only;
        }
    }

    pub fn rename_child(&mut self, parent: ValueId, link: LinkId, name: impl Into<EcoString>) {
        let node = self.node_mut(parent);
        if let Some(child) = node.children.iter_mut().find(|child| child.id == link) {
            child.name = name.into();
            node.array_len.set(None);
        }
    }

    pub fn remove_child(&mut self, parent: ValueId, link: LinkId) -> bool {
        let node = self.node_mut(parent);
        let Some(position) = node.children.iter().position(|child| child.id == link) else {
            return false;
        };
        let removed = node.children.remove(position);
        node.array_len.set(None);
        if removed.owning {
            self.release(removed.value);
        }
        true
    }

    pub fn remove_all_children(&mut self, parent: ValueId) {
        let node = self.node_mut(parent);
        let children = core::mem::take(&mut node.children);
        node.array_len.set(None);
        for child in children {
            if child.owning {
                self.release(child.value);
            }
        }
    }

    // ========================================================================
    // Arrays
    // ========================================================================

    /// Highest integer-named child plus one; 0 for non-arrays.
    pub fn array_len(&self, id: ValueId) -> i32 {
        let node = self.node(id);
        if !node.value.is_array() {
            return 0;
        }
        if let Some(len) = node.array_len.get() {
            return len;
        }
        let len = node
            .children
            .iter()
            .filter_map(|child| child.name.parse::<i32>().ok())
            .filter(|index| *index >= 0)
            .map(|index| index + 1)
            .max()
            .unwrap_or(0);
        node.array_len.set(Some(len));
        len
    }

    pub fn array_get(&self, id: ValueId, index: i32) -> Option<ValueId> {
        let key = index.to_string();
        self.find_child(id, &key).map(|link| link.value)
    }

    /// Store `value` at `index`. Storing undefined deletes the slot.
    pub fn array_set(&mut self, id: ValueId, index: i32, value: ValueId) {
        let key = index.to_string();
        let existing = self.find_child(id, &key).map(|link| link.id);
        let undefined = self.get(value).is_undefined();
        match (existing, undefined) {
            (Some(link), true) => {
                self.remove_child(id, link);
            }
            (Some(link), false) => {
                self.replace_child(id, link, value);
            }
            (None, true) => {}
            (None, false) => {
                self.add_child(id, key, value);
            }
        }
    }

    pub fn array_push(&mut self, id: ValueId, value: ValueId) {
        let len = self.array_len(id);
        self.add_child(id, len.to_string(), value);
    }

    // ========================================================================
    // Copying
    // ========================================================================

    /// Clone a value graph. `prototype` children are shared, not copied;
    /// nodes reachable twice are copied once.
    ///
    /// The returned node has no references.
    pub fn deep_copy(&mut self, id: ValueId) -> ValueId {
        let mut copies = HashMap::new();
        self.copy_node(id, &mut copies)
    }

    fn copy_node(&mut self, id: ValueId, copies: &mut HashMap<ValueId, ValueId>) -> ValueId {
        if let Some(copy) = copies.get(&id) {
            return *copy;
        }
        let copy = self.alloc(self.get(id).clone());
        copies.insert(id, copy);
        self.copy_children(id, copy, copies);
        copy
    }

    fn copy_children(&mut self, from: ValueId, to: ValueId, copies: &mut HashMap<ValueId, ValueId>) {
        let children = self.children(from).to_vec();
        for child in children {
            if child.name == PROTOTYPE {
                self.push_child(to, child.name, child.value, child.read_only, child.owning);
                continue;
            }
            let value = self.copy_node(child.value, copies);
            self.push_child(to, child.name, value, child.read_only, true);
        }
    }

    /// Make `target` a structural copy of `source`, replacing its payload
    /// and children.
    pub fn copy_value(&mut self, target: ValueId, source: ValueId) {
        let value = self.get(source).clone();
        self.set(target, value);
        self.remove_all_children(target);
        let mut copies = HashMap::new();
        copies.insert(source, target);
        self.copy_children(source, target, &mut copies);
    }
}
