//! The qualitative state graph.
//!
//! Nodes are state descriptions keyed by value; each node owns an ordered
//! list of successors. The graph only grows: nodes and edges are added, never
//! removed or rewritten. Two structural rules are enforced on insertion: no
//! node points to itself, and for any pair of nodes at most one direction of
//! edge exists.

pub mod traverse;

use std::collections::HashMap;

use thiserror::Error;

use crate::state::StateDescription;

/// Errors that can occur while growing a state graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("state not in graph: {0}")]
    NodeNotFound(StateDescription),

    #[error("self-loop on state {0}")]
    SelfLoop(StateDescription),

    #[error("reverse edge already present: {dst} -> {src}")]
    ReverseEdgeExists {
        src: StateDescription,
        dst: StateDescription,
    },
}

/// Discovery-order name of the node at `index`: `s0`, `s1`, ...
pub fn node_name(index: usize) -> String {
    format!("s{index}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    state: StateDescription,
    successors: Vec<StateDescription>,
}

/// Directed graph over state descriptions, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateGraph {
    entries: Vec<Entry>,
    /// Index: state -> position in `entries`.
    index: HashMap<StateDescription, usize>,
    edge_count: usize,
}

impl StateGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, state: &StateDescription) -> bool {
        self.index.contains_key(state)
    }

    /// Position of `state` in discovery order.
    pub fn position(&self, state: &StateDescription) -> Option<usize> {
        self.index.get(state).copied()
    }

    /// Discovery-order name of `state`, if it is a node.
    pub fn name_of(&self, state: &StateDescription) -> Option<String> {
        self.position(state).map(node_name)
    }

    /// All nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &StateDescription> {
        self.entries.iter().map(|e| &e.state)
    }

    /// Ordered successors of `state`, or `None` if it is not a node.
    pub fn successors(&self, state: &StateDescription) -> Option<&[StateDescription]> {
        self.index
            .get(state)
            .map(|&i| self.entries[i].successors.as_slice())
    }

    /// Nodes with an edge into `state`, in discovery order.
    pub fn predecessors(&self, state: &StateDescription) -> Vec<StateDescription> {
        self.entries
            .iter()
            .filter(|e| e.successors.contains(state))
            .map(|e| e.state)
            .collect()
    }

    /// Every node paired with its successors, in discovery order.
    pub fn adjacency(&self) -> impl Iterator<Item = (&StateDescription, &[StateDescription])> {
        self.entries
            .iter()
            .map(|e| (&e.state, e.successors.as_slice()))
    }

    /// Every edge as `(source, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (StateDescription, StateDescription)> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.successors.iter().map(move |t| (e.state, *t)))
    }

    pub fn has_edge(&self, src: &StateDescription, dst: &StateDescription) -> bool {
        self.successors(src).is_some_and(|s| s.contains(dst))
    }

    /// Nodes without successors.
    pub fn terminal_nodes(&self) -> Vec<StateDescription> {
        self.entries
            .iter()
            .filter(|e| e.successors.is_empty())
            .map(|e| e.state)
            .collect()
    }

    /// Make sure `state` has an adjacency entry. Returns `true` if it was
    /// newly inserted.
    pub fn ensure_node(&mut self, state: StateDescription) -> bool {
        if self.index.contains_key(&state) {
            return false;
        }
        self.index.insert(state, self.entries.len());
        self.entries.push(Entry {
            state,
            successors: Vec::new(),
        });
        true
    }

    /// Record the edge `src -> dst`, inserting `dst` as a node if needed.
    ///
    /// Returns `Ok(false)` when the edge was already present.
    pub fn add_edge(
        &mut self,
        src: StateDescription,
        dst: StateDescription,
    ) -> Result<bool, GraphError> {
        if src == dst {
            return Err(GraphError::SelfLoop(src));
        }
        let src_idx = self
            .position(&src)
            .ok_or(GraphError::NodeNotFound(src))?;
        if self.has_edge(&dst, &src) {
            return Err(GraphError::ReverseEdgeExists { src, dst });
        }
        if self.entries[src_idx].successors.contains(&dst) {
            return Ok(false);
        }
        self.ensure_node(dst);
        self.entries[src_idx].successors.push(dst);
        self.edge_count += 1;
        Ok(true)
    }
}
