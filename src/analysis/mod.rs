//! Per-center affinity analysis
//!
//! Runs the full pipeline for one center over a shared, read-only graph:
//! neighborhood extraction, tier classification, radial layout, scoring.
//! Results are keyed by entity so callers never deal with dense indices.

pub mod batch;

use crate::algo::{
    aggregate, build_view, classify_neighborhood, extract_neighborhood, induced_edges, radial_layout,
    EdgeKind, SummaryScore, Tier,
};
use crate::config::AnalysisSettings;
use crate::graph::{EntityKey, GraphError, RelationshipGraph};
use affinity_algorithms::GraphView;
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Reverse;
use thiserror::Error;
use tracing::debug;

pub use batch::{all_centers, run_batch, BatchReport, CenterOutcome};

/// Errors surfaced by a single analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The center never appeared in the relationship records
    #[error("Center not found: {0}")]
    CenterNotFound(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// One neighbor of the center, as listed in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborSummary {
    pub key: EntityKey,
    /// Neighborhood members (center included) this neighbor links to
    pub network_connections: usize,
    /// Link count between the center and this neighbor
    pub direct_links: u64,
    /// Link count of this neighbor across the whole graph
    pub total_links: u64,
    pub tier: Tier,
}

/// Coordinates of one node in the radial layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub radius: f64,
    /// `None` for the center
    pub tier: Option<Tier>,
}

/// Edge of the induced neighborhood subgraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedEdge {
    pub a: EntityKey,
    pub b: EntityKey,
    pub weight: u64,
    pub kind: EdgeKind,
}

/// Everything a renderer or report writer needs for one center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffinityView {
    pub center: EntityKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Neighbors in adjacency (insertion) order
    pub neighbors: Vec<NeighborSummary>,
    /// Center first, then rings from Hub to Low
    pub layout: IndexMap<EntityKey, Placement>,
    pub edges: Vec<PlacedEdge>,
    pub score: SummaryScore,
}

impl AffinityView {
    /// The center exists but has no neighbor; the layout is just the center
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn tier_of(&self, key: &str) -> Option<Tier> {
        self.neighbors.iter().find(|n| n.key.as_str() == key).map(|n| n.tier)
    }

    /// Neighbor -> tier, in adjacency order
    pub fn tier_assignment(&self) -> IndexMap<EntityKey, Tier> {
        self.neighbors.iter().map(|n| (n.key.clone(), n.tier)).collect()
    }

    /// Report rows sorted by network connections desc, then direct links
    /// desc, then key
    pub fn report_rows(&self) -> Vec<NeighborSummary> {
        let mut rows = self.neighbors.clone();
        rows.sort_by(|a, b| {
            (Reverse(a.network_connections), Reverse(a.direct_links), &a.key)
                .cmp(&(Reverse(b.network_connections), Reverse(b.direct_links), &b.key))
        });
        rows
    }

    /// `<sort key>_<center>.<extension>`
    pub fn artifact_name(&self, extension: &str) -> String {
        self.score.file_name(self.center.as_str(), extension)
    }
}

/// Runs the pipeline for any number of centers over one graph
pub struct Analyzer<'g> {
    graph: &'g RelationshipGraph,
    view: GraphView,
    settings: AnalysisSettings,
}

impl<'g> Analyzer<'g> {
    pub fn new(graph: &'g RelationshipGraph, settings: AnalysisSettings) -> Self {
        Self {
            graph,
            view: build_view(graph),
            settings,
        }
    }

    pub fn graph(&self) -> &RelationshipGraph {
        self.graph
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyze one center.
    ///
    /// Fails with [`AnalysisError::CenterNotFound`] when the key is absent
    /// from the records; a known center without neighbors yields an empty view.
    pub fn analyze(&self, center: &str) -> AnalysisResult<AffinityView> {
        let center_idx = self
            .graph
            .index_of(center)
            .map_err(|_| AnalysisError::CenterNotFound(center.to_string()))?;
        let neighborhood = extract_neighborhood(&self.view, center_idx as u64)
            .ok_or_else(|| AnalysisError::CenterNotFound(center.to_string()))?;

        let assignment = classify_neighborhood(&self.view, &neighborhood, &self.settings.thresholds);
        let layout = radial_layout(&neighborhood, &assignment, &self.settings.radii, self.settings.tie_break);
        let edges = induced_edges(&self.view, &neighborhood, &assignment);
        let score = aggregate(&self.view, center_idx, &assignment, &self.settings.weights);

        let neighbors = assignment
            .members
            .iter()
            .zip(&assignment.counts)
            .zip(&assignment.tiers)
            .map(|((&member, &count), &tier)| -> AnalysisResult<NeighborSummary> {
                Ok(NeighborSummary {
                    key: self.key(member)?,
                    network_connections: count,
                    direct_links: self.view.weight_between(center_idx, member),
                    total_links: self.view.total_weight(member),
                    tier,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        let layout = layout
            .positions
            .iter()
            .map(|p| -> AnalysisResult<(EntityKey, Placement)> {
                Ok((
                    self.key(p.node)?,
                    Placement {
                        x: p.x,
                        y: p.y,
                        angle: p.angle,
                        radius: p.radius,
                        tier: p.tier,
                    },
                ))
            })
            .collect::<AnalysisResult<IndexMap<_, _>>>()?;

        let edges = edges
            .into_iter()
            .map(|e| -> AnalysisResult<PlacedEdge> {
                Ok(PlacedEdge {
                    a: self.key(e.a)?,
                    b: self.key(e.b)?,
                    weight: e.weight,
                    kind: e.kind,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;

        debug!(center, neighbors = neighbors.len(), key = %score.sort_key(), "center analyzed");

        Ok(AffinityView {
            center: EntityKey::new(center),
            display_name: self.graph.display_name(center).map(str::to_string),
            neighbors,
            layout,
            edges,
            score,
        })
    }

    fn key(&self, idx: usize) -> AnalysisResult<EntityKey> {
        self.graph
            .key(idx)
            .cloned()
            .ok_or_else(|| GraphError::UnknownNode(format!("#{}", idx)).into())
    }
}
