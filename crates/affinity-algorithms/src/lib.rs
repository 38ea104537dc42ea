pub mod common;
pub mod neighborhood;
pub mod tier;
pub mod layout;
pub mod score;

pub use common::{GraphView, NodeId};
pub use neighborhood::{extract_neighborhood, network_connections, connection_counts, Neighborhood};
pub use tier::{classify_count, classify_neighborhood, Tier, ThresholdTable, TierAssignment, TierError};
pub use layout::{induced_edges, radial_layout, EdgeKind, Layout, LayoutEdge, Position, TieBreak, TierRadii};
pub use score::{aggregate, SummaryScore, TierWeights};
