//! Core type definitions for the relationship graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use tracing::warn;

/// Opaque entity identifier (e.g., a project key such as "PAY")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: impl Into<String>) -> Self {
        EntityKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        EntityKey(s)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        EntityKey(s.to_string())
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An entity as seen by a report: its key and optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub key: EntityKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity {
    /// Display name when known, otherwise the key
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.key.as_str())
    }
}

/// One row of the relationship table: `source <-> target` with a link count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub source: EntityKey,
    pub target: EntityKey,
    /// Raw link count; negative values are coerced to 0 when the graph is built
    pub link_count: i64,
    /// The link count could not be parsed and was coerced to 0
    pub malformed: bool,
}

impl RelationshipRecord {
    pub fn new(source: impl Into<EntityKey>, target: impl Into<EntityKey>, link_count: i64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            link_count,
            malformed: false,
        }
    }

    /// Build a record from a raw text weight.
    ///
    /// Integers are taken as-is, finite decimals are truncated toward zero,
    /// and anything else becomes 0 with a warning (never 1).
    pub fn parse(source: impl Into<EntityKey>, target: impl Into<EntityKey>, raw: &str) -> Self {
        let source = source.into();
        let target = target.into();
        let trimmed = raw.trim();

        let parsed = trimmed.parse::<i64>().ok().or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
                .map(|v| v.trunc() as i64)
        });

        match parsed {
            Some(link_count) => Self {
                source,
                target,
                link_count,
                malformed: false,
            },
            None => {
                warn!(%source, %target, raw = trimmed, "unparseable link count, using 0");
                Self {
                    source,
                    target,
                    link_count: 0,
                    malformed: true,
                }
            }
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        let key = EntityKey::new("PAY");
        assert_eq!(key.as_str(), "PAY");
        assert_eq!(format!("{}", key), "PAY");

        let key2: EntityKey = "CARD".into();
        assert!(key < key2 || key2 < key);
        let borrowed: &str = key.borrow();
        assert_eq!(borrowed, "PAY");
    }

    #[test]
    fn test_entity_label() {
        let named = Entity { key: "PAY".into(), name: Some("Payment Services".into()) };
        let bare = Entity { key: "CARD".into(), name: None };
        assert_eq!(named.label(), "Payment Services");
        assert_eq!(bare.label(), "CARD");
    }

    #[test]
    fn test_parse_link_counts() {
        assert_eq!(RelationshipRecord::parse("A", "B", "12").link_count, 12);
        assert_eq!(RelationshipRecord::parse("A", "B", " 7 ").link_count, 7);
        assert_eq!(RelationshipRecord::parse("A", "B", "3.9").link_count, 3);
        assert_eq!(RelationshipRecord::parse("A", "B", "-4").link_count, -4);

        let bad = RelationshipRecord::parse("A", "B", "n/a");
        assert_eq!(bad.link_count, 0);
        assert!(bad.malformed);

        let empty = RelationshipRecord::parse("A", "B", "");
        assert_eq!(empty.link_count, 0);
        assert!(empty.malformed);

        assert!(RelationshipRecord::parse("A", "B", "NaN").malformed);
        assert!(RelationshipRecord::parse("A", "B", "inf").malformed);
    }

    #[test]
    fn test_self_loop() {
        assert!(RelationshipRecord::new("A", "A", 1).is_self_loop());
        assert!(!RelationshipRecord::new("A", "B", 1).is_self_loop());
    }
}
