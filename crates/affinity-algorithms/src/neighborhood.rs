//! Induced neighborhood extraction
//!
//! The neighborhood of a center is `{center} ∪ neighbors(center)`, treated as
//! a closed subgraph: every metric computed here only looks at edges whose
//! two endpoints are members.

use super::common::{GraphView, NodeId};
use std::collections::HashSet;

/// The center of an analysis plus its direct neighbors (dense indices).
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    /// Dense index of the center
    pub center: usize,
    /// Direct neighbors in adjacency order, center excluded
    pub members: Vec<usize>,
    /// Membership index: members plus the center
    pub index: HashSet<usize>,
}

impl Neighborhood {
    /// True when the center has no neighbor at all
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Membership test used by every classifier (center included)
    pub fn contains(&self, idx: usize) -> bool {
        self.index.contains(&idx)
    }
}

/// Extract the one-hop neighborhood of `center`.
///
/// Returns `None` when the center is not part of the view. A center without
/// edges yields an empty neighborhood, not `None`.
pub fn extract_neighborhood(view: &GraphView, center: NodeId) -> Option<Neighborhood> {
    let center_idx = view.index_of(center)?;

    let members: Vec<usize> = view
        .neighbors(center_idx)
        .iter()
        .zip(view.weights(center_idx))
        .filter(|(&n, &w)| w > 0 && n != center_idx)
        .map(|(&n, _)| n)
        .collect();

    let mut index: HashSet<usize> = members.iter().copied().collect();
    index.insert(center_idx);

    Some(Neighborhood {
        center: center_idx,
        members,
        index,
    })
}

/// Number of distinct neighborhood members (center included) that `member`
/// has a positive-weight edge to. Edges leaving the neighborhood are ignored.
pub fn network_connections(view: &GraphView, neighborhood: &Neighborhood, member: usize) -> usize {
    view.neighbors(member)
        .iter()
        .zip(view.weights(member))
        .filter(|(&n, &w)| w > 0 && n != member && neighborhood.contains(n))
        .count()
}

/// [`network_connections`] for every member, aligned with `neighborhood.members`.
pub fn connection_counts(view: &GraphView, neighborhood: &Neighborhood) -> Vec<usize> {
    neighborhood
        .members
        .iter()
        .map(|&m| network_connections(view, neighborhood, m))
        .collect()
}
