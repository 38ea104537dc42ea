//! Batch analysis over many centers
//!
//! Each center is an independent run over the same immutable graph, so the
//! batch fans out across the rayon pool with no coordination. A missing
//! center never aborts the batch.

use super::{AffinityView, AnalysisError, AnalysisResult, Analyzer};
use crate::graph::{EntityKey, RelationshipGraph};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{info, warn};

/// Result of one center in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CenterOutcome {
    Analyzed { view: Box<AffinityView> },
    Empty { view: Box<AffinityView> },
    NotFound { center: String },
}

impl CenterOutcome {
    pub fn view(&self) -> Option<&AffinityView> {
        match self {
            CenterOutcome::Analyzed { view } | CenterOutcome::Empty { view } => Some(view),
            CenterOutcome::NotFound { .. } => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            CenterOutcome::Analyzed { .. } => "ok",
            CenterOutcome::Empty { .. } => "empty neighborhood",
            CenterOutcome::NotFound { .. } => "not found",
        }
    }
}

/// Outcomes of a batch, in the order the centers were requested
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<(String, CenterOutcome)>,
}

impl BatchReport {
    /// One line per center: `PAY: ok (0042_0015_0003_0004_0005_0003)`
    pub fn status_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|(center, outcome)| match outcome {
                CenterOutcome::Analyzed { view } => {
                    format!("{}: {} ({})", center, outcome.status(), view.score.sort_key())
                }
                _ => format!("{}: {}", center, outcome.status()),
            })
            .collect()
    }

    /// Analyzed, non-empty views
    pub fn views(&self) -> impl Iterator<Item = &AffinityView> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            CenterOutcome::Analyzed { view } => Some(view.as_ref()),
            _ => None,
        })
    }

    pub fn count(&self, status: &str) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.status() == status).count()
    }
}

/// Analyze every center in parallel.
///
/// Unknown centers become [`CenterOutcome::NotFound`]; graph contract
/// violations are propagated.
pub fn run_batch<S>(analyzer: &Analyzer<'_>, centers: &[S]) -> AnalysisResult<BatchReport>
where
    S: AsRef<str> + Sync,
{
    let outcomes = centers
        .par_iter()
        .map(|center| {
            let center = center.as_ref();
            let outcome = match analyzer.analyze(center) {
                Ok(view) if view.is_empty() => CenterOutcome::Empty { view: Box::new(view) },
                Ok(view) => CenterOutcome::Analyzed { view: Box::new(view) },
                Err(AnalysisError::CenterNotFound(_)) => {
                    warn!(center, "center not found");
                    CenterOutcome::NotFound {
                        center: center.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            Ok((center.to_string(), outcome))
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    let report = BatchReport { outcomes };
    info!(
        centers = centers.len(),
        ok = report.count("ok"),
        empty = report.count("empty neighborhood"),
        not_found = report.count("not found"),
        "batch finished"
    );
    Ok(report)
}

/// Every entity, by total link weight descending (first appearance breaks ties)
pub fn all_centers(graph: &RelationshipGraph) -> Vec<EntityKey> {
    let mut keys: Vec<(u64, &EntityKey)> = graph
        .keys()
        .map(|k| (graph.total_weight(k.as_str()).unwrap_or(0), k))
        .collect();
    keys.sort_by_key(|&(total, _)| Reverse(total));
    keys.into_iter().map(|(_, k)| k.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisSettings;
    use crate::graph::RelationshipRecord;

    fn graph() -> RelationshipGraph {
        RelationshipGraph::build(vec![
            RelationshipRecord::new("PAY", "CARD", 4),
            RelationshipRecord::new("PAY", "IMG", 1),
            RelationshipRecord::new("CARD", "IMG", 2),
            RelationshipRecord::new("SOLO", "SOLO", 1),
        ])
    }

    #[test]
    fn test_batch_continues_past_missing_centers() {
        let graph = graph();
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
        let report = run_batch(&analyzer, &["PAY", "GHOST", "SOLO", "CARD"]).unwrap();

        let lines = report.status_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("PAY: ok ("));
        assert_eq!(lines[1], "GHOST: not found");
        assert_eq!(lines[2], "SOLO: empty neighborhood");
        assert!(lines[3].starts_with("CARD: ok"));

        assert_eq!(report.views().count(), 2);
        assert_eq!(report.count("not found"), 1);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let graph = graph();
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
        let report = run_batch(&analyzer, &["CARD".to_string(), "PAY".to_string()]).unwrap();

        let batch_pay = report.outcomes[1].1.view().unwrap();
        assert_eq!(batch_pay, &analyzer.analyze("PAY").unwrap());
    }

    #[test]
    fn test_all_centers_by_total_weight() {
        let graph = graph();
        let keys: Vec<String> = all_centers(&graph).iter().map(|k| k.to_string()).collect();
        // CARD 6, PAY 5, IMG 3, SOLO 0
        assert_eq!(keys, vec!["CARD", "PAY", "IMG", "SOLO"]);
    }

    #[test]
    fn test_empty_batch() {
        let graph = graph();
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
        let centers: [&str; 0] = [];
        let report = run_batch(&analyzer, &centers).unwrap();
        assert!(report.outcomes.is_empty());
    }
}
