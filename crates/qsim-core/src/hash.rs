//! Content fingerprints for state graphs.
//!
//! The fingerprint covers every node and its ordered successors in discovery
//! order, so two builds from the same schedule produce the same hash.

use sha2::{Digest, Sha256};

use crate::graph::StateGraph;

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Compute the SHA-256 fingerprint of a graph's adjacency.
pub fn graph_fingerprint(graph: &StateGraph) -> ContentHash {
    let mut hasher = Sha256::new();
    for (state, successors) in graph.adjacency() {
        hasher.update(state.label().as_bytes());
        hasher.update(b" ->");
        for next in successors {
            hasher.update(b" [");
            hasher.update(next.label().as_bytes());
            hasher.update(b"]");
        }
        hasher.update(b"\n");
    }
    hasher.finalize().into()
}

/// Format a content hash as a hex string.
pub fn hash_hex(hash: &ContentHash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
