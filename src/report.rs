//! Markdown report writer
//!
//! Renders the per-center connection tables of a batch: summary statistics,
//! a ranking of entities by total links, then one table per analyzed center.

use crate::algo::{ThresholdTable, Tier};
use crate::analysis::{AffinityView, BatchReport};
use crate::graph::RelationshipGraph;
use std::cmp::Reverse;

/// Rows shown in the ranking table
const RANKING_ROWS: usize = 20;
/// Connections named in the "Top Connections" line
const TOP_CONNECTIONS: usize = 3;

/// `1234567` -> `1,234,567`
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Make text safe for a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// e.g. `Hub Ring (6+ connections)`, `Low Ring (1 connection)`
pub fn ring_label(tier: Tier, thresholds: &ThresholdTable) -> String {
    match thresholds.describe(tier) {
        Some(range) if range == "1" => format!("{} Ring (1 connection)", tier),
        Some(range) => format!("{} Ring ({} connections)", tier, range),
        None => format!("{} Ring", tier),
    }
}

/// Markdown for a whole batch
pub struct MarkdownReport<'a> {
    graph: &'a RelationshipGraph,
    thresholds: &'a ThresholdTable,
    generated: Option<String>,
}

impl<'a> MarkdownReport<'a> {
    pub fn new(graph: &'a RelationshipGraph, thresholds: &'a ThresholdTable) -> Self {
        Self {
            graph,
            thresholds,
            generated: None,
        }
    }

    /// Stamp the footer with a generation time
    pub fn generated_at(mut self, stamp: impl Into<String>) -> Self {
        self.generated = Some(stamp.into());
        self
    }

    fn name_of(&self, key: &str) -> &str {
        self.graph.display_name(key).unwrap_or("Unknown")
    }

    pub fn render(&self, batch: &BatchReport) -> String {
        let mut md = String::new();
        let node_count = self.graph.node_count();
        let total_links = self.graph.total_link_count();

        md.push_str(&format!("# Project Connection Tables - {} Projects\n", node_count));
        md.push_str("## Individual Project Perspectives\n\n");

        md.push_str("### Summary Statistics\n");
        md.push_str(&format!("- **Total Projects Analyzed**: {}\n", node_count));
        md.push_str(&format!(
            "- **Total Relationship Records**: {}\n",
            thousands(self.graph.stats().records as u64)
        ));
        md.push_str(&format!("- **Total Link Count**: {}\n", thousands(total_links)));
        let average = if node_count == 0 { 0.0 } else { total_links as f64 / node_count as f64 };
        md.push_str(&format!("- **Average Links per Project**: {:.1}\n\n", average));

        self.render_rankings(&mut md);
        md.push_str("\n---\n\n");

        for view in batch.views() {
            self.render_center(&mut md, view);
        }

        self.render_notes(&mut md);
        md
    }

    fn render_rankings(&self, md: &mut String) {
        let mut ranked: Vec<(&str, u64, usize)> = self
            .graph
            .keys()
            .map(|k| {
                let key = k.as_str();
                (
                    key,
                    self.graph.total_weight(key).unwrap_or(0),
                    self.graph.degree(key).unwrap_or(0),
                )
            })
            .collect();
        ranked.sort_by_key(|&(_, total, _)| Reverse(total));

        md.push_str("### Project Rankings by Total Links\n\n");
        md.push_str("| Rank | Project Code | Project Name | Total Links | Direct Connections |\n");
        md.push_str("|------|--------------|--------------|-------------|-------------------|\n");
        for (rank, (key, total, degree)) in ranked.into_iter().take(RANKING_ROWS).enumerate() {
            md.push_str(&format!(
                "| {:2} | **{}** | {} | {} | {} |\n",
                rank + 1,
                cell(key),
                cell(self.name_of(key)),
                thousands(total),
                degree
            ));
        }
    }

    fn render_center(&self, md: &mut String, view: &AffinityView) {
        let center = view.center.as_str();
        let rows = view.report_rows();

        md.push_str(&format!(
            "## {} ({}) - {} Direct Connections\n\n",
            center,
            self.name_of(center),
            rows.len()
        ));
        md.push_str(&format!(
            "**Total Links**: {}\n\n",
            thousands(self.graph.total_weight(center).unwrap_or(0))
        ));
        md.push_str(&format!("**Sort Key**: `{}`\n\n", view.score.sort_key()));

        md.push_str("| Source→Target | Network Connections | Direct Links | Total Links | Ring Classification |\n");
        md.push_str("|---------------|---------------------|--------------|-------------|--------------------|\n");
        for row in &rows {
            md.push_str(&format!(
                "| {}→{} | {} | {} | {} | {} |\n",
                cell(center),
                cell(row.key.as_str()),
                row.network_connections,
                thousands(row.direct_links),
                thousands(row.total_links),
                ring_label(row.tier, self.thresholds)
            ));
        }

        let distribution: Vec<String> = Tier::ALL
            .iter()
            .map(|&tier| format!("{}: {}", tier, view.score.count(tier)))
            .collect();
        md.push_str(&format!("\n**Ring Distribution**: {}\n\n", distribution.join(", ")));

        let top: Vec<String> = rows
            .iter()
            .take(TOP_CONNECTIONS)
            .map(|row| format!("{} ({} links)", row.key, thousands(row.direct_links)))
            .collect();
        if !top.is_empty() {
            md.push_str(&format!("**Top Connections**: {}\n\n", top.join(", ")));
        }

        md.push_str("---\n\n");
    }

    fn render_notes(&self, md: &mut String) {
        let rings: Vec<String> = self
            .thresholds
            .entries()
            .iter()
            .rev()
            .filter_map(|e| self.thresholds.describe(e.tier).map(|r| format!("{} ({})", e.tier, r)))
            .collect();

        md.push_str("\n## Analysis Notes\n\n");
        md.push_str("- **Network Connections**: Number of other projects this project connects to within the central project's network\n");
        md.push_str("- **Direct Links**: Link count between the two projects\n");
        md.push_str("- **Total Links**: Sum of all links for the target project across the entire network\n");
        md.push_str(&format!("- **Ring Classification**: {} network connections\n", rings.join(", ")));
        if let Some(stamp) = &self.generated {
            md.push_str(&format!("\n**Generated**: {}\n", stamp));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{run_batch, Analyzer};
    use crate::config::AnalysisSettings;
    use crate::graph::RelationshipRecord;

    #[test]
    fn test_pipes_in_keys_are_escaped() {
        let mut graph = RelationshipGraph::build(vec![RelationshipRecord::new("A|B", "C", 2)]);
        graph.set_display_name("C", "Core | Shared").unwrap();
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
        let batch = run_batch(&analyzer, &["A|B"]).unwrap();
        let md = MarkdownReport::new(&graph, &analyzer.settings().thresholds).render(&batch);

        assert!(md.contains("| **A\\|B** |"));
        assert!(md.contains("| Core \\| Shared |"));
        assert!(md.contains("| A\\|B→C |"));
        assert!(!md.contains("A|B→"));
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_ring_labels() {
        let table = ThresholdTable::standard();
        assert_eq!(ring_label(Tier::Hub, &table), "Hub Ring (6+ connections)");
        assert_eq!(ring_label(Tier::High, &table), "High Ring (4-5 connections)");
        assert_eq!(ring_label(Tier::Low, &table), "Low Ring (1 connection)");
    }

    #[test]
    fn test_render_report() {
        let mut graph = RelationshipGraph::build(vec![
            RelationshipRecord::new("PAY", "CARD", 1200),
            RelationshipRecord::new("PAY", "IMG", 3),
            RelationshipRecord::new("CARD", "IMG", 2),
        ]);
        graph.set_display_name("PAY", "Payment Services").unwrap();

        let settings = AnalysisSettings::default();
        let analyzer = Analyzer::new(&graph, settings.clone());
        let batch = run_batch(&analyzer, &["PAY", "MISSING"]).unwrap();

        let md = MarkdownReport::new(&graph, &settings.thresholds)
            .generated_at("2026-01-01 00:00:00")
            .render(&batch);

        assert!(md.starts_with("# Project Connection Tables - 3 Projects"));
        assert!(md.contains("- **Total Link Count**: 1,205"));
        assert!(md.contains("|  1 | **PAY** | Payment Services | 1,203 | 2 |"));
        assert!(md.contains("## PAY (Payment Services) - 2 Direct Connections"));
        assert!(md.contains("| PAY→CARD | 2 | 1,200 | 1,202 | Medium Ring (2-3 connections) |"));
        assert!(md.contains("**Ring Distribution**: Hub: 0, High: 0, Medium: 2, Low: 0"));
        assert!(md.contains("**Top Connections**: CARD (1,200 links), IMG (3 links)"));
        assert!(md.contains("Hub (6+), High (4-5), Medium (2-3), Low (1)"));
        assert!(md.ends_with("**Generated**: 2026-01-01 00:00:00\n"));
        assert!(!md.contains("## MISSING"));
    }
}
