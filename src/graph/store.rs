//! In-memory relationship graph
//!
//! Undirected, weighted, no self loops. Records for the same unordered pair
//! are summed. Entities are indexed densely in first-appearance order, which
//! is the "insertion order" every downstream ordering falls back to.

use super::types::{Entity, EntityKey, RelationshipRecord};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during graph queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The key never appeared in the input records
    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Counters collected while building a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Records seen, including skipped ones
    pub records: usize,
    /// Records whose link count was unparseable or negative (coerced to 0)
    pub malformed: usize,
    /// Records dropped because source == target
    pub self_loops: usize,
    /// Records added onto an already existing pair
    pub merged: usize,
}

/// Undirected weighted graph over entity keys
///
/// - entities: EntityKey -> dense index (insertion ordered)
/// - adjacency: index -> (neighbor index -> summed weight), positive weights only
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    entities: IndexSet<EntityKey>,
    adjacency: Vec<IndexMap<usize, u64>>,
    display_names: HashMap<usize, String>,
    stats: BuildStats,
}

impl RelationshipGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a sequence of records
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RelationshipRecord>,
    {
        let mut graph = Self::new();
        for record in records {
            graph.add_record(record);
        }
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            records = graph.stats.records,
            malformed = graph.stats.malformed,
            self_loops = graph.stats.self_loops,
            merged = graph.stats.merged,
            "relationship graph built"
        );
        graph
    }

    /// Add one record, merging it into an existing pair if present
    pub fn add_record(&mut self, record: RelationshipRecord) {
        self.stats.records += 1;

        let weight = if record.link_count < 0 {
            warn!(source = %record.source, target = %record.target, link_count = record.link_count,
                "negative link count, using 0");
            self.stats.malformed += 1;
            0
        } else {
            if record.malformed {
                self.stats.malformed += 1;
            }
            record.link_count as u64
        };

        if record.is_self_loop() {
            debug!(node = %record.source, "self loop skipped");
            self.stats.self_loops += 1;
            self.intern(record.source);
            return;
        }

        let a = self.intern(record.source);
        let b = self.intern(record.target);
        if weight == 0 {
            return;
        }

        let previous = self.adjacency[a].get(&b).copied();
        if previous.is_some() {
            self.stats.merged += 1;
        }
        let summed = previous.unwrap_or(0).checked_add(weight).unwrap_or_else(|| {
            warn!(source = %self.entities[a], target = %self.entities[b], "link count overflow, saturating");
            u64::MAX
        });
        self.adjacency[a].insert(b, summed);
        self.adjacency[b].insert(a, summed);
    }

    fn intern(&mut self, key: EntityKey) -> usize {
        let (idx, inserted) = self.entities.insert_full(key);
        if inserted {
            self.adjacency.push(IndexMap::new());
        }
        idx
    }

    /// Whether the key appeared in any record
    pub fn contains(&self, key: &str) -> bool {
        self.entities.contains(key)
    }

    /// Dense index of a key
    pub fn index_of(&self, key: &str) -> GraphResult<usize> {
        self.entities
            .get_index_of(key)
            .ok_or_else(|| GraphError::UnknownNode(key.to_string()))
    }

    /// Key of a dense index
    pub fn key(&self, idx: usize) -> Option<&EntityKey> {
        self.entities.get_index(idx)
    }

    /// All entities in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.entities.iter()
    }

    /// Entity with its display name, if any
    pub fn entity(&self, key: &str) -> GraphResult<Entity> {
        let idx = self.index_of(key)?;
        Ok(Entity {
            key: self.entities[idx].clone(),
            name: self.display_names.get(&idx).cloned(),
        })
    }

    /// Direct neighbors in the order their first edge was recorded
    pub fn neighbors(&self, key: &str) -> GraphResult<Vec<&EntityKey>> {
        let idx = self.index_of(key)?;
        Ok(self.adjacency[idx]
            .keys()
            .filter_map(|&n| self.entities.get_index(n))
            .collect())
    }

    /// Summed link count between two entities (0 when not adjacent)
    pub fn weight(&self, a: &str, b: &str) -> GraphResult<u64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        Ok(self.adjacency[a].get(&b).copied().unwrap_or(0))
    }

    /// Sum of all incident edge weights
    pub fn total_weight(&self, key: &str) -> GraphResult<u64> {
        let idx = self.index_of(key)?;
        Ok(self.adjacency[idx].values().fold(0, |acc, &w| acc.saturating_add(w)))
    }

    /// Number of distinct neighbors
    pub fn degree(&self, key: &str) -> GraphResult<usize> {
        let idx = self.index_of(key)?;
        Ok(self.adjacency[idx].len())
    }

    /// `(neighbor index, weight)` pairs of a dense index
    pub fn adjacency(&self, idx: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.adjacency
            .get(idx)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&n, &w)| (n, w)))
    }

    pub fn set_display_name(&mut self, key: &str, name: impl Into<String>) -> GraphResult<()> {
        let idx = self.index_of(key)?;
        self.display_names.insert(idx, name.into());
        Ok(())
    }

    pub fn display_name(&self, key: &str) -> Option<&str> {
        let idx = self.entities.get_index_of(key)?;
        self.display_names.get(&idx).map(String::as_str)
    }

    /// Apply a key -> name table, ignoring keys absent from the graph
    pub fn apply_display_names<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut applied = 0;
        for (key, name) in names {
            if self.set_display_name(key, name.clone()).is_ok() {
                applied += 1;
            }
        }
        applied
    }

    pub fn node_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(IndexMap::len).sum::<usize>() / 2
    }

    /// Sum of all edge weights, each undirected edge counted once
    pub fn total_link_count(&self) -> u64 {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, row)| row.iter().filter(move |&(&b, _)| b > a).map(|(_, &w)| w))
            .fold(0, u64::saturating_add)
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }
}
