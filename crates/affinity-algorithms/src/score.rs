//! Summary scoring
//!
//! Per-tier counts, the weighted composite score and link totals of one
//! center, plus the fixed-width key used to rank centers against each other.

use super::common::GraphView;
use super::tier::{Tier, TierAssignment};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Score contributed by one neighbor of each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TierWeights {
    pub hub: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            hub: 4,
            high: 3,
            medium: 2,
            low: 1,
        }
    }
}

impl TierWeights {
    pub fn weight(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Hub => self.hub,
            Tier::High => self.high,
            Tier::Medium => self.medium,
            Tier::Low => self.low,
        }
    }
}

/// Derived summary of one center's neighborhood.
///
/// [`SummaryScore::sort_key`] pads every field to four digits, so keys
/// compare lexicographically in numeric order only while each field stays
/// below 10000. A wider field is written in full and then sorts as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryScore {
    pub weighted_sum: u64,
    pub total_neighbors: usize,
    pub hub_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    /// Sum of every neighbor's global link weight
    pub neighbor_link_total: u64,
    /// Sum of center-to-neighbor edge weights
    pub direct_link_total: u64,
}

impl SummaryScore {
    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Hub => self.hub_count,
            Tier::High => self.high_count,
            Tier::Medium => self.medium_count,
            Tier::Low => self.low_count,
        }
    }

    /// Ranking fields in key order
    pub fn fields(&self) -> [u64; 6] {
        [
            self.weighted_sum,
            self.total_neighbors as u64,
            self.hub_count as u64,
            self.high_count as u64,
            self.medium_count as u64,
            self.low_count as u64,
        ]
    }

    /// Zero-padded, underscore-joined key, e.g. `0013_0006_0001_0002_0000_0003`.
    /// Fields wider than four digits are written in full.
    pub fn sort_key(&self) -> String {
        self.fields()
            .iter()
            .map(|v| format!("{:04}", v))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Artifact name: `<sort_key>_<center>.<extension>`
    pub fn file_name(&self, center: &str, extension: &str) -> String {
        format!("{}_{}.{}", self.sort_key(), center, extension.trim_start_matches('.'))
    }
}

/// Aggregate a tier assignment into a [`SummaryScore`].
///
/// `center` is the dense index of the neighborhood center; it is only used for
/// the direct link total.
pub fn aggregate(
    view: &GraphView,
    center: usize,
    assignment: &TierAssignment,
    weights: &TierWeights,
) -> SummaryScore {
    let mut score = SummaryScore {
        total_neighbors: assignment.len(),
        ..Default::default()
    };

    for (&member, &tier) in assignment.members.iter().zip(&assignment.tiers) {
        score.weighted_sum = score.weighted_sum.saturating_add(weights.weight(tier));
        match tier {
            Tier::Hub => score.hub_count += 1,
            Tier::High => score.high_count += 1,
            Tier::Medium => score.medium_count += 1,
            Tier::Low => score.low_count += 1,
        }
        score.neighbor_link_total = score.neighbor_link_total.saturating_add(view.total_weight(member));
        score.direct_link_total = score.direct_link_total.saturating_add(view.weight_between(center, member));
    }

    score
}
