//! Weighted area scoring.
//!
//! Each category gets an independent 0-100 sub-score from its own curve;
//! the composite is `Σ (sub/100 × weight)` over the configured weights,
//! rounded to the nearest integer. A category with no configured weight
//! contributes nothing. Price and general vibe are fixed placeholders
//! until listings and qualitative analysis land.

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::config::{CommuteCriteria, Criteria, SafetyThresholds};
use crate::enrich::{AmenityReport, CrimeReport, NatureReport};

/// Neutral sub-score used when a category has no usable data.
const NEUTRAL_SCORE: f64 = 70.0;

/// Points per park in the nature curve.
const POINTS_PER_PARK: f64 = 15.0;

/// Bonus for countryside access.
const COUNTRYSIDE_BONUS: f64 = 30.0;

/// Scoring categories recognised by the weight table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Commute,
    Nature,
    Amenities,
    Price,
    GeneralVibe,
    Safety,
}

impl ScoreCategory {
    /// Parse a weight-table key. Unknown keys yield `None`, so criteria
    /// files can carry categories this engine does not score.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "commute" => Some(Self::Commute),
            "nature" => Some(Self::Nature),
            "amenities" => Some(Self::Amenities),
            "price" => Some(Self::Price),
            "general_vibe" => Some(Self::GeneralVibe),
            "safety" => Some(Self::Safety),
            _ => None,
        }
    }
}

/// Commute sub-score.
///
/// 100 at or under 30 minutes, 0 at or over the configured ceiling,
/// linear in between. A per-change penalty is subtracted afterwards,
/// floored at zero.
pub fn commute_subscore(
    commute_minutes: u32,
    mainline_changes: u32,
    criteria: &CommuteCriteria,
) -> f64 {
    let max = criteria.max_minutes;
    let base = if commute_minutes <= 30 {
        100.0
    } else if commute_minutes >= max {
        0.0
    } else {
        100.0 - ((commute_minutes - 30) as f64 / (max - 30) as f64) * 100.0
    };

    let penalty = mainline_changes as f64 * criteria.train_change_penalty.penalty_per_change;
    (base - penalty).max(0.0)
}

/// Nature sub-score: 15 points per park capped at 100, plus a capped
/// 30-point countryside bonus.
pub fn nature_subscore(parks_count: u32, countryside_access: bool) -> f64 {
    let mut score = (parks_count as f64 * POINTS_PER_PARK).min(100.0);
    if countryside_access {
        score = (score + COUNTRYSIDE_BONUS).min(100.0);
    }
    score
}

/// Amenity sub-score from supermarket access.
///
/// Three or more supermarkets is full marks; zero still scores 20, since
/// it is still a real place.
pub fn amenity_subscore(supermarket_count: usize) -> f64 {
    match supermarket_count {
        0 => 20.0,
        1 | 2 => 60.0 + (supermarket_count as f64 - 1.0) * 20.0,
        _ => 100.0,
    }
}

/// Safety sub-score from crime statistics.
///
/// Serious crimes are double-counted in the weighted total to reflect
/// their outsized effect on how safe a place feels. Without usable crime
/// data the score is the neutral 70.
pub fn safety_subscore(crime: Option<&CrimeReport>, thresholds: &SafetyThresholds) -> f64 {
    let Some(crime) = crime else {
        return NEUTRAL_SCORE;
    };
    if !crime.api_success {
        return NEUTRAL_SCORE;
    }

    let weighted = (crime.total_crimes + crime.serious_crimes) as f64;
    let excellent = thresholds.excellent_threshold as f64;
    let good = thresholds.good_threshold as f64;
    let acceptable = thresholds.acceptable_threshold as f64;

    if weighted <= excellent {
        100.0
    } else if weighted <= good {
        100.0 - (weighted - excellent) / (good - excellent) * 20.0
    } else if weighted <= acceptable {
        80.0 - (weighted - good) / (acceptable - good) * 30.0
    } else {
        (50.0 - (weighted - acceptable) / acceptable * 50.0).max(0.0)
    }
}

/// Price sub-score. Placeholder until listings data is integrated.
pub fn price_subscore() -> f64 {
    NEUTRAL_SCORE
}

/// General-vibe sub-score. Placeholder for future qualitative analysis.
pub fn general_vibe_subscore() -> f64 {
    NEUTRAL_SCORE
}

/// Composite 0-100 score for an area.
///
/// Crime data is optional; a missing or failed report degrades the safety
/// category to its neutral default rather than blocking the score.
pub fn score_area(
    area: &Area,
    amenities: &AmenityReport,
    nature: &NatureReport,
    crime: Option<&CrimeReport>,
    criteria: &Criteria,
) -> u8 {
    let subscore = |category: ScoreCategory| -> f64 {
        match category {
            ScoreCategory::Commute => commute_subscore(
                area.commute_minutes,
                area.mainline_changes.unwrap_or(0),
                &criteria.commute,
            ),
            ScoreCategory::Nature => {
                nature_subscore(nature.parks_count, nature.countryside_access)
            }
            ScoreCategory::Amenities => amenity_subscore(amenities.supermarkets.len()),
            ScoreCategory::Price => price_subscore(),
            ScoreCategory::GeneralVibe => general_vibe_subscore(),
            ScoreCategory::Safety => safety_subscore(crime, &criteria.safety),
        }
    };

    let total: f64 = criteria
        .scoring
        .iter()
        .map(|(category, weight)| subscore(category) / 100.0 * weight)
        .sum();

    total.round().clamp(0.0, 100.0) as u8
}
