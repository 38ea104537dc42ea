//! Affinity
//!
//! Neighborhood-relative tiering and radial layout for project relationship
//! graphs. For a chosen center entity, its direct neighbors are tiered by how
//! densely they interconnect among themselves and the center, placed on
//! concentric rings, and summarized by a sortable score.
//!
//! # Pipeline
//!
//! records → [`RelationshipGraph`] → neighborhood → tiers → radial layout → score
//!
//! ## Example Usage
//!
//! ```rust
//! use affinity::{AnalysisSettings, Analyzer, RelationshipGraph, RelationshipRecord, Tier};
//!
//! let graph = RelationshipGraph::build(vec![
//!     RelationshipRecord::new("PAY", "CARD", 12),
//!     RelationshipRecord::new("CARD", "PAY", 3),
//!     RelationshipRecord::new("PAY", "IMG", 4),
//!     RelationshipRecord::new("CARD", "IMG", 1),
//! ]);
//! assert_eq!(graph.weight("PAY", "CARD").unwrap(), 15);
//!
//! let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
//! let view = analyzer.analyze("PAY").unwrap();
//! assert_eq!(view.tier_of("CARD"), Some(Tier::Medium));
//! assert_eq!(view.artifact_name("png"), "0004_0002_0000_0000_0002_0000_PAY.png");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analysis;
pub mod config;
pub mod graph;
pub mod loader;
pub mod matrix;
pub mod report;

// Re-export main types for convenience
pub use graph::{
    BuildStats, Entity, EntityKey, GraphError, GraphResult, RelationshipGraph, RelationshipRecord,
};

pub use algo::{
    SummaryScore, ThresholdTable, TieBreak, Tier, TierRadii, TierWeights,
};

pub use analysis::{
    all_centers, run_batch, AffinityView, AnalysisError, AnalysisResult, Analyzer, BatchReport,
    CenterOutcome, NeighborSummary, PlacedEdge, Placement,
};

pub use config::{AffinityConfig, AnalysisSettings, ColumnNames, ConfigError, ConfigResult, ThresholdSpec};

pub use loader::{load_records, read_records, LoadError, LoadResult};

pub use matrix::ConnectionMatrix;

pub use report::MarkdownReport;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
