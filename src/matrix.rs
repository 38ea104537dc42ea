//! Connection matrix export
//!
//! Symmetric entity-by-entity link counts, ordered by total link weight
//! descending. This is the data behind a connection heatmap.

use crate::graph::{EntityKey, GraphResult, RelationshipGraph};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionMatrix {
    pub keys: Vec<EntityKey>,
    /// Total link weight of each key across the whole graph
    pub totals: Vec<u64>,
    /// `values[i][j]` = link count between `keys[i]` and `keys[j]`
    pub values: Vec<Vec<u64>>,
}

impl ConnectionMatrix {
    /// Matrix of the `top` heaviest entities, skipping `exclude`d keys.
    /// `None` keeps every remaining entity.
    pub fn build(graph: &RelationshipGraph, top: Option<usize>, exclude: &[String]) -> GraphResult<Self> {
        let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();

        let mut ranked: Vec<(&EntityKey, u64)> = graph
            .keys()
            .filter(|k| !excluded.contains(k.as_str()))
            .map(|k| graph.total_weight(k.as_str()).map(|total| (k, total)))
            .collect::<GraphResult<_>>()?;
        ranked.sort_by_key(|&(_, total)| Reverse(total));
        ranked.truncate(top.unwrap_or(ranked.len()));

        let mut values = vec![vec![0; ranked.len()]; ranked.len()];
        for (i, (a, _)) in ranked.iter().enumerate() {
            for (j, (b, _)) in ranked.iter().enumerate().skip(i + 1) {
                let w = graph.weight(a.as_str(), b.as_str())?;
                values[i][j] = w;
                values[j][i] = w;
            }
        }

        Ok(Self {
            keys: ranked.iter().map(|(k, _)| (*k).clone()).collect(),
            totals: ranked.iter().map(|&(_, t)| t).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Write CSV with a header row of keys and one row per key
    pub fn write_csv<W: Write>(&self, out: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(std::iter::once("").chain(self.keys.iter().map(EntityKey::as_str)))?;
        for (key, row) in self.keys.iter().zip(&self.values) {
            let cells = row.iter().map(u64::to_string);
            writer.write_record(std::iter::once(key.to_string()).chain(cells))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv(&self) -> csv::Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipRecord;

    fn graph() -> RelationshipGraph {
        RelationshipGraph::build(vec![
            RelationshipRecord::new("A", "B", 10),
            RelationshipRecord::new("B", "C", 1),
            RelationshipRecord::new("C", "D", 2),
            RelationshipRecord::new("A", "D", 3),
        ])
    }

    #[test]
    fn test_matrix_is_symmetric_and_ranked() {
        let matrix = ConnectionMatrix::build(&graph(), None, &[]).unwrap();

        let keys: Vec<&str> = matrix.keys.iter().map(|k| k.as_str()).collect();
        // A 13, B 11, D 5, C 3
        assert_eq!(keys, vec!["A", "B", "D", "C"]);
        assert_eq!(matrix.totals, vec![13, 11, 5, 3]);
        for i in 0..matrix.len() {
            assert_eq!(matrix.values[i][i], 0);
            for j in 0..matrix.len() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
        assert_eq!(matrix.values[0][1], 10);
    }

    #[test]
    fn test_top_and_exclude() {
        let matrix = ConnectionMatrix::build(&graph(), Some(2), &["A".to_string()]).unwrap();
        let keys: Vec<&str> = matrix.keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "D"]);
        assert_eq!(matrix.values, vec![vec![0, 0], vec![0, 0]]);
    }

    #[test]
    fn test_csv() {
        let matrix = ConnectionMatrix::build(&graph(), Some(2), &[]).unwrap();
        assert_eq!(matrix.to_csv().unwrap(), ",A,B\nA,0,10\nB,10,0\n");
    }

    #[test]
    fn test_csv_quotes_keys_with_commas() {
        let graph = RelationshipGraph::build(vec![RelationshipRecord::new("A, Inc", "B", 2)]);
        let text = ConnectionMatrix::build(&graph, None, &[]).unwrap().to_csv().unwrap();
        assert_eq!(text, ",\"A, Inc\",B\n\"A, Inc\",0,2\nB,2,0\n");

        let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(&rows[0][1], "A, Inc");
    }
}
