//! Search and scoring criteria configuration.
//!
//! Criteria are externally supplied (YAML), with defaults matching the
//! stock weighting. Unknown keys are ignored; a file that fails to parse
//! at all is the one configuration error allowed to abort a run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreCategory;

/// Errors loading criteria configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Could not read the criteria file
    #[error("failed to read criteria file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid criteria YAML
    #[error("failed to parse criteria: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level search and scoring criteria.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Criteria {
    /// Commute limits and penalties.
    #[serde(default)]
    pub commute: CommuteCriteria,

    /// Crime thresholds for the safety sub-score.
    #[serde(default)]
    pub safety: SafetyThresholds,

    /// Per-category score weights.
    #[serde(default)]
    pub scoring: ScoreWeights,
}

impl Criteria {
    /// Load criteria from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse criteria from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Commute-related criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteCriteria {
    /// Total door-to-hub commute ceiling in minutes. At or beyond this the
    /// commute sub-score is zero.
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,

    /// Walking allowance added on top of the train time.
    #[serde(default = "default_walking_buffer")]
    pub walking_buffer_minutes: u32,

    /// Penalty applied per required train change.
    #[serde(default)]
    pub train_change_penalty: ChangePenalty,
}

impl Default for CommuteCriteria {
    fn default() -> Self {
        Self {
            max_minutes: default_max_minutes(),
            walking_buffer_minutes: default_walking_buffer(),
            train_change_penalty: ChangePenalty::default(),
        }
    }
}

fn default_max_minutes() -> u32 {
    75
}

fn default_walking_buffer() -> u32 {
    10
}

/// Score penalty for journeys that require changing trains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePenalty {
    /// Points subtracted from the commute sub-score per change.
    #[serde(default = "default_penalty_per_change")]
    pub penalty_per_change: f64,
}

impl Default for ChangePenalty {
    fn default() -> Self {
        Self {
            penalty_per_change: default_penalty_per_change(),
        }
    }
}

fn default_penalty_per_change() -> f64 {
    15.0
}

/// Crime-count thresholds delimiting the safety score bands.
///
/// The weighted count compared against these is `total + serious` (serious
/// crimes counted twice).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyThresholds {
    /// At or below this weighted count the safety sub-score is 100.
    #[serde(default = "default_excellent")]
    pub excellent_threshold: u32,

    /// Upper bound of the 100-to-80 band.
    #[serde(default = "default_good")]
    pub good_threshold: u32,

    /// Upper bound of the 80-to-50 band.
    #[serde(default = "default_acceptable")]
    pub acceptable_threshold: u32,
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self {
            excellent_threshold: default_excellent(),
            good_threshold: default_good(),
            acceptable_threshold: default_acceptable(),
        }
    }
}

fn default_excellent() -> u32 {
    50
}

fn default_good() -> u32 {
    100
}

fn default_acceptable() -> u32 {
    200
}

/// Per-category weights for the composite score.
///
/// Weights need not sum to 100, but the composite reads as a percentage
/// only when they approximate a 100-point distribution. A category absent
/// from the map contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreWeights {
    weights: BTreeMap<ScoreCategory, f64>,
}

impl<'de> Deserialize<'de> for ScoreWeights {
    /// Unrecognised weight keys are dropped rather than failing the
    /// parse, so a criteria file can carry categories this build does not
    /// score.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let weights = raw
            .into_iter()
            .filter_map(|(key, weight)| ScoreCategory::from_key(&key).map(|c| (c, weight)))
            .collect();
        Ok(Self { weights })
    }
}

impl ScoreWeights {
    /// Build weights from explicit (category, weight) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ScoreCategory, f64)>) -> Self {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    /// The weight for a category, if configured.
    pub fn get(&self, category: ScoreCategory) -> Option<f64> {
        self.weights.get(&category).copied()
    }

    /// Iterate configured (category, weight) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ScoreCategory, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }
}

impl Default for ScoreWeights {
    /// The stock 110-point distribution from the original criteria file.
    fn default() -> Self {
        Self::from_pairs([
            (ScoreCategory::Commute, 35.0),
            (ScoreCategory::Nature, 20.0),
            (ScoreCategory::Amenities, 10.0),
            (ScoreCategory::Price, 25.0),
            (ScoreCategory::GeneralVibe, 5.0),
            (ScoreCategory::Safety, 15.0),
        ])
    }
}
