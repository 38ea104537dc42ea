//! Analysis configuration
//!
//! Every tunable of the pipeline lives here so that one policy is applied to
//! every center: threshold table, ring radii, in-ring ordering, tier weights,
//! CSV column names and display names. Loaded from YAML.

use crate::algo::{ThresholdTable, TieBreak, TierError, TierRadii, TierWeights};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid thresholds: {0}")]
    Thresholds(#[from] TierError),

    #[error("Ring radii must be positive and strictly increase from hub to low: {0:?}")]
    InvalidRadii(TierRadii),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Thresholds given either as a preset name or as an explicit table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSpec {
    Preset(String),
    Table(ThresholdTable),
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        ThresholdSpec::Preset("standard".to_string())
    }
}

impl ThresholdSpec {
    pub fn resolve(&self) -> ConfigResult<ThresholdTable> {
        match self {
            ThresholdSpec::Preset(name) => Ok(ThresholdTable::preset(name)?),
            ThresholdSpec::Table(table) => Ok(table.clone()),
        }
    }
}

/// Header names of the relationship table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub source: String,
    pub target: String,
    pub weight: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            source: "ProjectKey".to_string(),
            target: "ConnectedProject".to_string(),
            weight: "LinkCount".to_string(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    pub thresholds: ThresholdSpec,
    pub radii: TierRadii,
    pub tie_break: TieBreak,
    pub weights: TierWeights,
    pub columns: ColumnNames,
    /// Entity key -> display name
    pub display_names: IndexMap<String, String>,
}

/// Resolved, validated parameters of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub thresholds: ThresholdTable,
    pub radii: TierRadii,
    pub tie_break: TieBreak,
    pub weights: TierWeights,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::standard(),
            radii: TierRadii::default(),
            tie_break: TieBreak::default(),
            weights: TierWeights::default(),
        }
    }
}

impl AffinityConfig {
    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.settings()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Resolve presets and validate radii
    pub fn settings(&self) -> ConfigResult<AnalysisSettings> {
        if !self.radii.is_valid() {
            return Err(ConfigError::InvalidRadii(self.radii));
        }
        Ok(AnalysisSettings {
            thresholds: self.thresholds.resolve()?,
            radii: self.radii,
            tie_break: self.tie_break,
            weights: self.weights,
        })
    }
}
