//! Radial layout
//!
//! Center at the origin, one concentric ring per tier (Hub innermost), ring
//! members spread evenly by angle. The result is a pure function of its
//! inputs: identical inputs give bit-identical coordinates.

use super::common::GraphView;
use super::neighborhood::Neighborhood;
use super::tier::{Tier, TierAssignment};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ring radius per tier. Must satisfy `0 < hub < high < medium < low`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TierRadii {
    pub hub: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for TierRadii {
    fn default() -> Self {
        Self {
            hub: 0.15,
            high: 0.30,
            medium: 0.45,
            low: 0.60,
        }
    }
}

impl TierRadii {
    pub fn radius(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Hub => self.hub,
            Tier::High => self.high,
            Tier::Medium => self.medium,
            Tier::Low => self.low,
        }
    }

    /// True when radii grow strictly from Hub to Low and are all positive and finite
    pub fn is_valid(&self) -> bool {
        let rings = [self.hub, self.high, self.medium, self.low];
        rings.iter().all(|r| r.is_finite() && *r > 0.0) && rings.windows(2).all(|w| w[0] < w[1])
    }
}

/// Ordering of members inside one ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreak {
    /// Adjacency order, evenly spaced counter-clockwise from angle 0
    InsertionOrder,
    /// Network connections descending, first at 12 o'clock, then clockwise
    #[default]
    Clock,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::InsertionOrder => write!(f, "insertion_order"),
            TieBreak::Clock => write!(f, "clock"),
        }
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "insertion" | "insertion_order" => Ok(TieBreak::InsertionOrder),
            "clock" => Ok(TieBreak::Clock),
            other => Err(format!("unknown tie-break strategy: {}", other)),
        }
    }
}

/// Placement of a single node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub node: usize,
    pub x: f64,
    pub y: f64,
    /// Polar angle in radians (0 for the center)
    pub angle: f64,
    pub radius: f64,
    /// `None` for the center
    pub tier: Option<Tier>,
}

/// Immutable node placement: the center first, then rings from Hub to Low
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub center: usize,
    pub positions: Vec<Position>,
}

impl Layout {
    pub fn get(&self, node: usize) -> Option<&Position> {
        self.positions.iter().find(|p| p.node == node)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions of a single ring, in placement order
    pub fn ring(&self, tier: Tier) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(move |p| p.tier == Some(tier))
    }
}

/// Angles for a ring of `n` members
fn ring_angles(n: usize, tie_break: TieBreak) -> Vec<f64> {
    if n == 1 {
        return vec![FRAC_PI_2];
    }
    let step = TAU / n as f64;
    (0..n)
        .map(|i| match tie_break {
            TieBreak::InsertionOrder => step * i as f64,
            TieBreak::Clock => FRAC_PI_2 - step * i as f64,
        })
        .collect()
}

/// Place the center and every classified neighbor on its tier's ring.
pub fn radial_layout(
    neighborhood: &Neighborhood,
    assignment: &TierAssignment,
    radii: &TierRadii,
    tie_break: TieBreak,
) -> Layout {
    let mut positions = Vec::with_capacity(assignment.len() + 1);
    positions.push(Position {
        node: neighborhood.center,
        x: 0.0,
        y: 0.0,
        angle: 0.0,
        radius: 0.0,
        tier: None,
    });

    for tier in Tier::ALL {
        let mut ring = assignment.members_of(tier);
        if ring.is_empty() {
            continue;
        }
        if tie_break == TieBreak::Clock {
            // Stable: equal counts keep adjacency order
            ring.sort_by(|a, b| b.1.cmp(&a.1));
        }

        let radius = radii.radius(tier);
        let angles = ring_angles(ring.len(), tie_break);
        for ((node, _), angle) in ring.into_iter().zip(angles) {
            positions.push(Position {
                node,
                x: radius * angle.cos(),
                y: radius * angle.sin(),
                angle,
                radius,
                tier: Some(tier),
            });
        }
    }

    Layout {
        center: neighborhood.center,
        positions,
    }
}

/// Kind of an edge inside the neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeKind {
    /// Center to a neighbor of the given tier
    Spoke(Tier),
    /// Between two neighbors
    Peer,
}

/// Edge of the induced subgraph, `a < b` for peers, `a == center` for spokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub a: usize,
    pub b: usize,
    pub weight: u64,
    pub kind: EdgeKind,
}

/// Every positive-weight edge whose two endpoints lie in the neighborhood,
/// spokes first (member order), then peers (member order, each pair once).
pub fn induced_edges(view: &GraphView, neighborhood: &Neighborhood, assignment: &TierAssignment) -> Vec<LayoutEdge> {
    let center = neighborhood.center;
    let mut edges = Vec::new();

    for (&member, &tier) in assignment.members.iter().zip(&assignment.tiers) {
        edges.push(LayoutEdge {
            a: center,
            b: member,
            weight: view.weight_between(center, member),
            kind: EdgeKind::Spoke(tier),
        });
    }

    for (pos, &member) in neighborhood.members.iter().enumerate() {
        for (&other, &weight) in view.neighbors(member).iter().zip(view.weights(member)) {
            if weight == 0 || other == center || !neighborhood.contains(other) {
                continue;
            }
            // Emit each pair once, from the member that comes first
            let other_pos = neighborhood.members.iter().position(|&m| m == other);
            if matches!(other_pos, Some(p) if p > pos) {
                edges.push(LayoutEdge {
                    a: member.min(other),
                    b: member.max(other),
                    weight,
                    kind: EdgeKind::Peer,
                });
            }
        }
    }

    edges
}
