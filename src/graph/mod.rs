//! Relationship graph
//!
//! Builds an undirected, weighted graph from `source <-> target, link count`
//! records and answers neighborhood and weight queries by entity key.

pub mod store;
pub mod types;

// Re-export main types
pub use store::{BuildStats, GraphError, GraphResult, RelationshipGraph};
pub use types::{Entity, EntityKey, RelationshipRecord};
