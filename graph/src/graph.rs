//! Arena-indexed undirected contact graph.

use ivs_types::{MaskedVector, ParticipantId};
use std::collections::HashMap;
use tracing::debug;

/// Undirected adjacency over registered participants, plus the latest
/// committed masked status per node.
///
/// Nodes live in an arena: participant ids map to dense indices, adjacency
/// lists hold indices, and iteration order is insertion order — so two
/// replicas fed the same commit sequence produce identical traversals.
pub struct ExposureGraph {
    index: HashMap<ParticipantId, usize>,
    nodes: Vec<ParticipantId>,
    adjacency: Vec<Vec<usize>>,
    statuses: Vec<Option<MaskedVector>>,
}

impl ExposureGraph {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            adjacency: Vec::new(),
            statuses: Vec::new(),
        }
    }

    fn ensure_node(&mut self, id: &ParticipantId) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(id.clone());
        self.adjacency.push(Vec::new());
        self.statuses.push(None);
        idx
    }

    /// Insert an undirected edge. Idempotent on the unordered pair:
    /// returns `false` when the logical edge already existed.
    pub fn add_edge(&mut self, a: &ParticipantId, b: &ParticipantId) -> bool {
        if a == b {
            return false;
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        if self.adjacency[ia].contains(&ib) {
            return false;
        }
        self.adjacency[ia].push(ib);
        self.adjacency[ib].push(ia);
        debug!(a = %a, b = %b, "edge added to exposure graph");
        true
    }

    /// Record the latest committed masked status for a participant,
    /// creating its node if no edge mentioned it yet.
    pub fn set_status(&mut self, id: &ParticipantId, masked: MaskedVector) {
        let idx = self.ensure_node(id);
        self.statuses[idx] = Some(masked);
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.index.contains_key(id)
    }

    pub fn index_of(&self, id: &ParticipantId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_id(&self, idx: usize) -> &ParticipantId {
        &self.nodes[idx]
    }

    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub fn masked_of(&self, idx: usize) -> Option<&MaskedVector> {
        self.statuses[idx].as_ref()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }
}

impl Default for ExposureGraph {
    fn default() -> Self {
        Self::new()
    }
}
