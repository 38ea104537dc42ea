//! Affinity algorithms module
//!
//! Algorithms are implemented in the `affinity-algorithms` crate.
//! This module provides the integration/adapter layer.

use crate::graph::RelationshipGraph;
use affinity_algorithms::{GraphView, NodeId as AlgoNodeId};

// Re-export algorithms
pub use affinity_algorithms::{
    extract_neighborhood, network_connections, connection_counts, Neighborhood,
    classify_count, classify_neighborhood, Tier, ThresholdTable, TierAssignment, TierError,
    induced_edges, radial_layout, EdgeKind, Layout, LayoutEdge, Position, TieBreak, TierRadii,
    aggregate, SummaryScore, TierWeights,
};

/// Build a GraphView from the relationship graph for algorithm execution.
///
/// Dense indices are shared: node `i` of the view is entity `i` of the graph,
/// and neighbor slices keep the graph's insertion order.
pub fn build_view(graph: &RelationshipGraph) -> GraphView {
    let node_count = graph.node_count();
    let index_to_node: Vec<AlgoNodeId> = (0..node_count as AlgoNodeId).collect();

    let adjacency: Vec<Vec<(usize, u64)>> = (0..node_count)
        .map(|idx| graph.adjacency(idx).filter(|&(_, w)| w > 0).collect())
        .collect();

    GraphView::from_adjacency_list(index_to_node, adjacency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipRecord;

    #[test]
    fn test_graph_view_projection() {
        let graph = RelationshipGraph::build(vec![
            RelationshipRecord::new("A", "B", 3),
            RelationshipRecord::new("B", "C", 5),
            RelationshipRecord::new("C", "B", 1),
        ]);

        let view = build_view(&graph);

        assert_eq!(view.node_count, 3);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        let c = graph.index_of("C").unwrap();

        assert_eq!(view.neighbors(b), &[a, c]);
        assert_eq!(view.weight_between(b, c), 6);
        assert_eq!(view.total_weight(b), graph.total_weight("B").unwrap());
        assert_eq!(view.degree(a), 1);
    }
}
