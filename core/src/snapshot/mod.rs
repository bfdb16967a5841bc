//! Binary snapshots of the value graph.
//!
//! A graph is written as a flat table of nodes, each with its payload and
//! an ordered list of edges naming other rows. Shared values and cycles
//! therefore come back shared. The table is encoded with `postcard`.
//!
//! Native callbacks cannot be written out. A native function is stored as
//! a placeholder carrying the dotted path it was found at; restoring it
//! picks up the callback registered at the same path on the target engine.

use std::collections::HashMap;

use ecow::EcoString;
use serde::{Deserialize, Serialize};

use crate::api::Error;
use crate::values::{FunctionBody, Heap, ScriptRegex, Value, ValueId};
use crate::{String, ToString, Vec, format};

/// A saved Root graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// postcard-encoded node table, Root first.
    pub root_state: Vec<u8>,
    /// Dotted paths of the native functions in the graph. Each must be
    /// registered on an engine before the snapshot can be restored there.
    pub native_function_names: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
enum Payload {
    Undefined,
    Null,
    Int(i32),
    Double(f64),
    Str(String),
    Regexp { pattern: String, flags: String },
    Object,
    Array,
    Function { body: String },
    Native { path: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct Edge {
    name: String,
    node: u32,
    read_only: bool,
    owning: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Node {
    payload: Payload,
    children: Vec<Edge>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Graph {
    nodes: Vec<Node>,
}

// ============================================================================
// Encoding
// ============================================================================

/// Collect every node reachable from `root` through owning links.
///
/// Rows are numbered in depth-first order, so row 0 is `root`. The first
/// path a node is reached by is kept for native functions.
fn number_nodes(heap: &Heap, root: ValueId) -> (Vec<ValueId>, HashMap<ValueId, u32>, Vec<String>) {
    let mut order = Vec::new();
    let mut rows = HashMap::new();
    let mut paths = Vec::new();
    let mut stack = vec![(root, String::new())];

    while let Some((id, path)) = stack.pop() {
        if rows.contains_key(&id) {
            continue;
        }
        rows.insert(id, order.len() as u32);
        order.push(id);
        paths.push(path.clone());

        for child in heap.children(id).iter().rev() {
            if !child.owning || rows.contains_key(&child.value) {
                continue;
            }
            let child_path = if path.is_empty() {
                child.name.to_string()
            } else {
                format!("{}.{}", path, child.name)
            };
            stack.push((child.value, child_path));
        }
    }
    (order, rows, paths)
}

fn build_graph(heap: &Heap, root: ValueId) -> (Graph, Vec<String>) {
    let (order, rows, paths) = number_nodes(heap, root);
    let mut natives = Vec::new();

    let nodes = order
        .iter()
        .zip(paths)
        .map(|(&id, path)| {
            let payload = match heap.get(id) {
                Value::Undefined => Payload::Undefined,
                Value::Null => Payload::Null,
                Value::Int(value) => Payload::Int(*value),
                Value::Double(value) => Payload::Double(*value),
                Value::Str(text) => Payload::Str(text.to_string()),
                Value::Regexp(regex) => Payload::Regexp {
                    pattern: regex.pattern().to_string(),
                    flags: regex.flags().to_string(),
                },
                Value::Object => Payload::Object,
                Value::Array => Payload::Array,
                Value::Function(FunctionBody::Script(body)) => Payload::Function {
                    body: body.to_string(),
                },
                Value::Function(FunctionBody::Native(_)) => {
                    natives.push(path.clone());
                    Payload::Native { path }
                }
            };
            // Prototype links to classes outside the graph are dropped.
            let children = heap
                .children(id)
                .iter()
                .filter_map(|child| {
                    Some(Edge {
                        name: child.name.to_string(),
                        node: *rows.get(&child.value)?,
                        read_only: child.read_only,
                        owning: child.owning,
                    })
                })
                .collect();
            Node { payload, children }
        })
        .collect();

    (Graph { nodes }, natives)
}

fn encode_graph(graph: &Graph) -> Result<Vec<u8>, Error> {
    postcard::to_allocvec(graph).map_err(|err| Error::Snapshot(format!("encoding failed: {}", err)))
}

/// Snapshot the graph under `root`.
pub fn save(heap: &Heap, root: ValueId) -> Result<Snapshot, Error> {
    let (graph, native_function_names) = build_graph(heap, root);
    Ok(Snapshot {
        root_state: encode_graph(&graph)?,
        native_function_names,
    })
}

/// Encode a standalone value graph.
pub fn encode_value(heap: &Heap, id: ValueId) -> Result<Vec<u8>, Error> {
    let (graph, _) = build_graph(heap, id);
    encode_graph(&graph)
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_graph(bytes: &[u8]) -> Result<Graph, Error> {
    let graph: Graph = postcard::from_bytes(bytes)
        .map_err(|err| Error::Snapshot(format!("decoding failed: {}", err)))?;
    let rows = graph.nodes.len();
    if rows == 0 {
        return Err(Error::Snapshot("snapshot holds no nodes".into()));
    }
    for node in &graph.nodes {
        if let Some(edge) = node.children.iter().find(|edge| edge.node as usize >= rows) {
            return Err(Error::Snapshot(format!(
                "child '{}' points at missing node {}",
                edge.name, edge.node
            )));
        }
    }
    Ok(graph)
}

/// Turn every payload into a value before anything touches the heap, so a
/// bad snapshot leaves the heap as it was.
fn resolve_payloads(
    graph: &Graph,
    native: &dyn Fn(&str) -> Option<Value>,
) -> Result<Vec<Value>, Error> {
    graph
        .nodes
        .iter()
        .map(|node| {
            Ok(match &node.payload {
                Payload::Undefined => Value::Undefined,
                Payload::Null => Value::Null,
                Payload::Int(value) => Value::Int(*value),
                Payload::Double(value) => Value::Double(*value),
                Payload::Str(text) => Value::string(text.as_str()),
                Payload::Regexp { pattern, flags } => ScriptRegex::new(pattern, flags)
                    .map(Value::Regexp)
                    .map_err(|err| Error::Snapshot(err.to_string()))?,
                Payload::Object => Value::Object,
                Payload::Array => Value::Array,
                Payload::Function { body } => Value::script_function(body.as_str()),
                Payload::Native { path } => native(path).ok_or_else(|| {
                    Error::Snapshot(format!("native function '{}' is not registered", path))
                })?,
            })
        })
        .collect()
}

/// Allocate the nodes and wire their children. Returns row 0, unreferenced.
fn build_nodes(heap: &mut Heap, graph: &Graph, payloads: Vec<Value>) -> ValueId {
    let ids: Vec<ValueId> = payloads.into_iter().map(|value| heap.alloc(value)).collect();
    for (node, &parent) in graph.nodes.iter().zip(&ids) {
        for edge in &node.children {
            let child = ids[edge.node as usize];
            let name = EcoString::from(edge.name.as_str());
            match (edge.owning, edge.read_only) {
                (false, _) => heap.add_prototype_link(parent, child),
                (true, true) => heap.add_const_child(parent, name, child),
                (true, false) => heap.add_child(parent, name, child),
            };
        }
    }
    // Adding a child turns an undefined node into an object.
    for (node, &id) in graph.nodes.iter().zip(&ids) {
        if matches!(node.payload, Payload::Undefined) {
            heap.set(id, Value::Undefined);
        }
    }
    ids[0]
}

/// Rebuild a standalone value graph encoded by [`encode_value`].
///
/// The returned value has no references yet; the caller retains it or
/// attaches it somewhere. Graphs holding native functions are rejected.
pub fn decode_value(heap: &mut Heap, bytes: &[u8]) -> Result<ValueId, Error> {
    let graph = decode_graph(bytes)?;
    let payloads = resolve_payloads(&graph, &|_| None)?;
    Ok(build_nodes(heap, &graph, payloads))
}

/// Rebuild a saved Root graph, taking native functions from `natives`.
pub(crate) fn load(
    heap: &mut Heap,
    snapshot: &Snapshot,
    natives: &dyn Fn(&str) -> Option<Value>,
) -> Result<ValueId, Error> {
    let graph = decode_graph(&snapshot.root_state)?;
    for path in &snapshot.native_function_names {
        if natives(path).is_none() {
            return Err(Error::Snapshot(format!(
                "native function '{}' is not registered",
                path
            )));
        }
    }
    let payloads = resolve_payloads(&graph, natives)?;
    Ok(build_nodes(heap, &graph, payloads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_child_stays_shared() {
        let mut heap = Heap::new();
        let root = heap.alloc(Value::Object);
        heap.retain(root);
        let shared = heap.alloc(Value::Int(7));
        heap.add_child(root, "a", shared);
        heap.add_child(root, "b", shared);

        let bytes = encode_value(&heap, root).unwrap();
        let copy = decode_value(&mut heap, &bytes).unwrap();
        heap.retain(copy);

        let a = heap.find_child(copy, "a").unwrap().value;
        let b = heap.find_child(copy, "b").unwrap().value;
        assert_eq!(a, b);
        assert_eq!(heap.get(a).as_int(), 7);
        assert_eq!(heap.refs(a), 2);
    }

    #[test]
    fn test_cycle_round_trips() {
        let mut heap = Heap::new();
        let root = heap.alloc(Value::Object);
        heap.retain(root);
        let child = heap.alloc(Value::Object);
        heap.add_child(root, "child", child);
        heap.add_child(child, "parent", root);

        let bytes = encode_value(&heap, root).unwrap();
        let copy = decode_value(&mut heap, &bytes).unwrap();
        let copied_child = heap.find_child(copy, "child").unwrap().value;
        assert_eq!(heap.find_child(copied_child, "parent").unwrap().value, copy);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let mut heap = Heap::new();
        let before = heap.live_count();
        let result = decode_value(&mut heap, &[0xff, 0xff, 0xff, 0x01]);
        assert!(matches!(result, Err(Error::Snapshot(_))));
        assert_eq!(heap.live_count(), before);
    }
}
