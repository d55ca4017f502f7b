//! Reachability queries over a finished state graph.

use std::collections::HashSet;

use super::StateGraph;
use crate::state::StateDescription;

/// All states reachable from `start` (including `start` itself if it is a
/// node), following edges depth-first.
pub fn reachable_from(graph: &StateGraph, start: &StateDescription) -> HashSet<StateDescription> {
    let mut seen = HashSet::new();
    let mut stack = Vec::new();
    if graph.contains(start) {
        stack.push(*start);
    }
    while let Some(state) = stack.pop() {
        if !seen.insert(state) {
            continue;
        }
        if let Some(successors) = graph.successors(&state) {
            stack.extend(successors.iter().filter(|s| !seen.contains(*s)));
        }
    }
    seen
}

/// True if a directed path leads from `src` to `dst`.
pub fn path_exists(graph: &StateGraph, src: &StateDescription, dst: &StateDescription) -> bool {
    reachable_from(graph, src).contains(dst)
}
