//! Shared utilities for affinity algorithms
//!
//! Provides a read-only, optimized view of the relationship topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected, weighted graph using
/// Compressed Sparse Row (CSR) format.
///
/// Every undirected edge is stored twice (once per endpoint). Neighbor
/// slices keep the order in which the adapter supplied them, which the
/// layout relies on for its insertion-order tie-break.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub targets: Vec<usize>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<u64>,
}

impl GraphView {
    /// Number of distinct neighbors of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbors of a node (by index)
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Weights of the edges returned by [`GraphView::neighbors`]
    pub fn weights(&self, idx: usize) -> &[u64] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.weights[start..end]
    }

    /// Weight of the edge between two nodes, 0 when they are not adjacent
    pub fn weight_between(&self, a: usize, b: usize) -> u64 {
        self.neighbors(a)
            .iter()
            .zip(self.weights(a))
            .find(|(&n, _)| n == b)
            .map(|(_, &w)| w)
            .unwrap_or(0)
    }

    /// Sum of incident edge weights, saturating at `u64::MAX`
    pub fn total_weight(&self, idx: usize) -> u64 {
        self.weights(idx).iter().fold(0, |acc, &w| acc.saturating_add(w))
    }

    /// Dense index of a node id, if present
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.node_to_index.get(&node).copied()
    }

    /// Helper to create a GraphView from per-node adjacency lists.
    ///
    /// `adjacency[i]` holds `(neighbor_index, weight)` pairs for node `i`;
    /// callers are responsible for symmetry.
    pub fn from_adjacency_list(
        index_to_node: Vec<NodeId>,
        adjacency: Vec<Vec<(usize, u64)>>,
    ) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();

        offsets.push(0);
        for row in adjacency.into_iter().take(node_count) {
            for (target, weight) in row {
                targets.push(target);
                weights.push(weight);
            }
            offsets.push(targets.len());
        }
        // Pad rows the caller did not supply
        while offsets.len() < node_count + 1 {
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights,
        }
    }

    /// Build a symmetric view from an undirected edge list over `0..node_count`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, u64)]) -> Self {
        let mut adjacency = vec![Vec::new(); node_count];
        for &(a, b, w) in edges {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
        Self::from_adjacency_list((0..node_count as NodeId).collect(), adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_projection() {
        // 0 - 1 (3), 1 - 2 (5)
        let view = GraphView::from_edges(3, &[(0, 1, 3), (1, 2, 5)]);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.neighbors(1), &[0, 2]);
        assert_eq!(view.weights(1), &[3, 5]);
        assert_eq!(view.degree(0), 1);
        assert_eq!(view.total_weight(1), 8);
        assert_eq!(view.weight_between(0, 1), 3);
        assert_eq!(view.weight_between(1, 0), 3);
        assert_eq!(view.weight_between(0, 2), 0);
    }

    #[test]
    fn test_missing_rows_are_padded() {
        let view = GraphView::from_adjacency_list(vec![10, 20, 30], vec![vec![(1, 1)], vec![(0, 1)]]);
        assert_eq!(view.offsets.len(), 4);
        assert_eq!(view.degree(2), 0);
        assert_eq!(view.index_of(30), Some(2));
        assert_eq!(view.index_of(40), None);
    }

    #[test]
    fn test_total_weight_saturates() {
        let view = GraphView::from_edges(3, &[(0, 1, u64::MAX), (0, 2, 7)]);
        assert_eq!(view.total_weight(0), u64::MAX);
        assert_eq!(view.total_weight(2), 7);
    }
}
