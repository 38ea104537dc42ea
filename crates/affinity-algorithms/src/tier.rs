//! Tier classification
//!
//! Maps a neighbor's network-connection count to one of the ordered tiers
//! `Hub > High > Medium > Low` through a threshold table. Tables are values,
//! so every center can be analysed with the same policy.

use super::common::GraphView;
use super::neighborhood::{connection_counts, Neighborhood};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Prominence tier of a neighbor. Declaration order gives `Low < Hub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tier {
    Low,
    Medium,
    High,
    Hub,
}

impl Tier {
    /// All tiers, most prominent first
    pub const ALL: [Tier; 4] = [Tier::Hub, Tier::High, Tier::Medium, Tier::Low];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Hub => "Hub",
            Tier::High => "High",
            Tier::Medium => "Medium",
            Tier::Low => "Low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Tier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hub" => Ok(Tier::Hub),
            "high" => Ok(Tier::High),
            "medium" => Ok(Tier::Medium),
            "low" => Ok(Tier::Low),
            other => Err(TierError::UnknownTier(other.to_string())),
        }
    }
}

/// Errors raised while building a threshold table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TierError {
    #[error("threshold table is empty")]
    Empty,

    #[error("thresholds must be strictly ascending: {previous} then {next}")]
    NotAscending { previous: u32, next: u32 },

    #[error("tiers must increase in prominence with their threshold: {previous} then {next}")]
    TierOrder { previous: Tier, next: Tier },

    #[error("lowest threshold must map to Low, found {0}")]
    BottomNotLow(Tier),

    #[error("lowest threshold must be at most 1, found {0}")]
    BottomTooHigh(u32),

    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("unknown threshold preset: {0}")]
    UnknownPreset(String),
}

/// One row of a threshold table: counts `>= min` map to `tier`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdEntry {
    pub min: u32,
    pub tier: Tier,
}

/// Ordered, validated list of `(min_inclusive, tier)` pairs, ascending by
/// `min_inclusive`, with `Low` at the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<ThresholdEntry>", into = "Vec<ThresholdEntry>"))]
pub struct ThresholdTable {
    entries: Vec<ThresholdEntry>,
}

impl ThresholdTable {
    pub fn new(pairs: &[(u32, Tier)]) -> Result<Self, TierError> {
        let entries = pairs
            .iter()
            .map(|&(min, tier)| ThresholdEntry { min, tier })
            .collect();
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ThresholdEntry>) -> Result<Self, TierError> {
        let bottom = entries.first().ok_or(TierError::Empty)?;
        if bottom.tier != Tier::Low {
            return Err(TierError::BottomNotLow(bottom.tier));
        }
        if bottom.min > 1 {
            return Err(TierError::BottomTooHigh(bottom.min));
        }

        for pair in entries.windows(2) {
            if pair[1].min <= pair[0].min {
                return Err(TierError::NotAscending {
                    previous: pair[0].min,
                    next: pair[1].min,
                });
            }
            if pair[1].tier <= pair[0].tier {
                return Err(TierError::TierOrder {
                    previous: pair[0].tier,
                    next: pair[1].tier,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Hub >= 6, High 4-5, Medium 2-3, Low 1
    pub fn standard() -> Self {
        Self {
            entries: vec![
                ThresholdEntry { min: 1, tier: Tier::Low },
                ThresholdEntry { min: 2, tier: Tier::Medium },
                ThresholdEntry { min: 4, tier: Tier::High },
                ThresholdEntry { min: 6, tier: Tier::Hub },
            ],
        }
    }

    /// Hub >= 4, High 3, Medium 2, Low 1 (small neighborhoods)
    pub fn compact() -> Self {
        Self {
            entries: vec![
                ThresholdEntry { min: 1, tier: Tier::Low },
                ThresholdEntry { min: 2, tier: Tier::Medium },
                ThresholdEntry { min: 3, tier: Tier::High },
                ThresholdEntry { min: 4, tier: Tier::Hub },
            ],
        }
    }

    /// Names accepted by [`ThresholdTable::preset`]
    pub const PRESETS: [&'static str; 2] = ["standard", "compact"];

    pub fn preset(name: &str) -> Result<Self, TierError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "compact" => Ok(Self::compact()),
            other => Err(TierError::UnknownPreset(other.to_string())),
        }
    }

    pub fn entries(&self) -> &[ThresholdEntry] {
        &self.entries
    }

    /// Human readable range for a tier, e.g. `4-5` or `6+`
    pub fn describe(&self, tier: Tier) -> Option<String> {
        let pos = self.entries.iter().position(|e| e.tier == tier)?;
        let min = self.entries[pos].min;
        Some(match self.entries.get(pos + 1) {
            Some(next) if next.min - 1 == min => format!("{}", min),
            Some(next) => format!("{}-{}", min, next.min - 1),
            None => format!("{}+", min),
        })
    }

    /// Highest tier whose threshold the count reaches. Boundaries are
    /// inclusive, and counts below every threshold fall to the bottom tier.
    pub fn classify(&self, count: usize) -> Tier {
        self.entries
            .iter()
            .rev()
            .find(|e| count >= e.min as usize)
            .map(|e| e.tier)
            .unwrap_or(self.entries[0].tier)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<ThresholdEntry>> for ThresholdTable {
    type Error = TierError;

    fn try_from(entries: Vec<ThresholdEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<ThresholdTable> for Vec<ThresholdEntry> {
    fn from(table: ThresholdTable) -> Self {
        table.entries
    }
}

/// Tier of every neighborhood member, aligned with `Neighborhood::members`
#[derive(Debug, Clone, PartialEq)]
pub struct TierAssignment {
    pub members: Vec<usize>,
    /// Network connections per member
    pub counts: Vec<usize>,
    pub tiers: Vec<Tier>,
}

impl TierAssignment {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn tier_of(&self, idx: usize) -> Option<Tier> {
        self.position(idx).map(|p| self.tiers[p])
    }

    pub fn connections_of(&self, idx: usize) -> Option<usize> {
        self.position(idx).map(|p| self.counts[p])
    }

    /// Number of members in a tier
    pub fn count(&self, tier: Tier) -> usize {
        self.tiers.iter().filter(|&&t| t == tier).count()
    }

    /// `(member, network_connections)` of a tier, in member order
    pub fn members_of(&self, tier: Tier) -> Vec<(usize, usize)> {
        self.members
            .iter()
            .zip(&self.counts)
            .zip(&self.tiers)
            .filter(|(_, &t)| t == tier)
            .map(|((&m, &c), _)| (m, c))
            .collect()
    }

    fn position(&self, idx: usize) -> Option<usize> {
        self.members.iter().position(|&m| m == idx)
    }
}

/// Classify a single count against a table
pub fn classify_count(count: usize, thresholds: &ThresholdTable) -> Tier {
    thresholds.classify(count)
}

/// Classify every member of a neighborhood by its induced connection count
pub fn classify_neighborhood(
    view: &GraphView,
    neighborhood: &Neighborhood,
    thresholds: &ThresholdTable,
) -> TierAssignment {
    let counts = connection_counts(view, neighborhood);
    let tiers = counts.iter().map(|&c| thresholds.classify(c)).collect();

    TierAssignment {
        members: neighborhood.members.clone(),
        counts,
        tiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::extract_neighborhood;

    #[test]
    fn test_standard_boundaries_are_inclusive() {
        let table = ThresholdTable::standard();
        assert_eq!(table.classify(1), Tier::Low);
        assert_eq!(table.classify(2), Tier::Medium);
        assert_eq!(table.classify(3), Tier::Medium);
        assert_eq!(table.classify(4), Tier::High);
        assert_eq!(table.classify(5), Tier::High);
        assert_eq!(table.classify(6), Tier::Hub);
        assert_eq!(table.classify(40), Tier::Hub);
    }

    #[test]
    fn test_compact_preset() {
        let table = ThresholdTable::preset("compact").unwrap();
        assert_eq!(table.classify(2), Tier::Medium);
        assert_eq!(table.classify(3), Tier::High);
        assert_eq!(table.classify(4), Tier::Hub);
        assert!(ThresholdTable::preset("pay").is_err());
    }

    #[test]
    fn test_zero_count_falls_to_bottom() {
        assert_eq!(ThresholdTable::standard().classify(0), Tier::Low);
    }

    #[test]
    fn test_invalid_tables() {
        assert_eq!(ThresholdTable::new(&[]), Err(TierError::Empty));
        assert_eq!(
            ThresholdTable::new(&[(1, Tier::Medium)]),
            Err(TierError::BottomNotLow(Tier::Medium))
        );
        assert_eq!(
            ThresholdTable::new(&[(2, Tier::Low)]),
            Err(TierError::BottomTooHigh(2))
        );
        assert_eq!(
            ThresholdTable::new(&[(1, Tier::Low), (3, Tier::High), (3, Tier::Hub)]),
            Err(TierError::NotAscending { previous: 3, next: 3 })
        );
        assert_eq!(
            ThresholdTable::new(&[(1, Tier::Low), (3, Tier::High), (5, Tier::Medium)]),
            Err(TierError::TierOrder { previous: Tier::High, next: Tier::Medium })
        );
    }

    #[test]
    fn test_three_tier_table() {
        let table = ThresholdTable::new(&[(1, Tier::Low), (3, Tier::High), (8, Tier::Hub)]).unwrap();
        assert_eq!(table.classify(2), Tier::Low);
        assert_eq!(table.classify(7), Tier::High);
        assert_eq!(table.describe(Tier::Medium), None);
    }

    #[test]
    fn test_describe_ranges() {
        let table = ThresholdTable::standard();
        assert_eq!(table.describe(Tier::Hub).unwrap(), "6+");
        assert_eq!(table.describe(Tier::High).unwrap(), "4-5");
        assert_eq!(table.describe(Tier::Low).unwrap(), "1");
    }

    #[test]
    fn test_tier_parsing_and_order() {
        assert_eq!("hub".parse::<Tier>().unwrap(), Tier::Hub);
        assert_eq!(" Medium ".parse::<Tier>().unwrap(), Tier::Medium);
        assert!("isolated".parse::<Tier>().is_err());
        assert!(Tier::Hub > Tier::High && Tier::High > Tier::Medium && Tier::Medium > Tier::Low);
    }

    #[test]
    fn test_classify_neighborhood_ignores_outside_nodes() {
        // Center 0 with neighbors 1..=3; 1-2 linked; 1 also linked to 4 and 5 outside
        let edges = [(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1), (1, 4, 1), (1, 5, 1)];
        let view = GraphView::from_edges(6, &edges);
        let nb = extract_neighborhood(&view, 0).unwrap();
        let assignment = classify_neighborhood(&view, &nb, &ThresholdTable::standard());

        assert_eq!(assignment.counts, vec![2, 2, 1]);
        assert_eq!(assignment.tier_of(1), Some(Tier::Medium));
        assert_eq!(assignment.tier_of(3), Some(Tier::Low));
        assert_eq!(assignment.tier_of(4), None);

        // Adding more outside edges does not move node 1
        let mut more = edges.to_vec();
        more.push((4, 5, 3));
        let view = GraphView::from_edges(6, &more);
        let nb = extract_neighborhood(&view, 0).unwrap();
        let again = classify_neighborhood(&view, &nb, &ThresholdTable::standard());
        assert_eq!(again, assignment);
    }

    #[test]
    fn test_members_of_tier() {
        let view = GraphView::from_edges(4, &[(0, 1, 1), (0, 2, 1), (0, 3, 1), (1, 2, 1)]);
        let nb = extract_neighborhood(&view, 0).unwrap();
        let assignment = classify_neighborhood(&view, &nb, &ThresholdTable::standard());

        assert_eq!(assignment.members_of(Tier::Medium), vec![(1, 2), (2, 2)]);
        assert_eq!(assignment.count(Tier::Low), 1);
        assert_eq!(assignment.count(Tier::Hub), 0);
    }
}
