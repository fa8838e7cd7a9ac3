//! Tracked health metrics
//!
//! Binds each metric to the rules the engine needs: how same-day records
//! combine, how gaps fill, which range policy applies and what the total
//! is called in responses.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::series::{CombineRule, DailyAggregator, FillPolicy};

/// A daily health metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedMetric {
    /// Water intake in millilitres
    Water,
    /// Exercise duration in minutes
    Exercise,
    /// Calories burned by exercise
    Calories,
    /// Body weight in kilograms
    Weight,
}

impl TrackedMetric {
    pub fn all() -> &'static [TrackedMetric] {
        &[
            TrackedMetric::Water,
            TrackedMetric::Exercise,
            TrackedMetric::Calories,
            TrackedMetric::Weight,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrackedMetric::Water => "water",
            TrackedMetric::Exercise => "exercise",
            TrackedMetric::Calories => "calories",
            TrackedMetric::Weight => "weight",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            TrackedMetric::Water => "ml",
            TrackedMetric::Exercise => "minutes",
            TrackedMetric::Calories => "kcal",
            TrackedMetric::Weight => "kg",
        }
    }

    pub fn combine_rule(&self) -> CombineRule {
        match self {
            TrackedMetric::Weight => CombineRule::Latest,
            _ => CombineRule::Sum,
        }
    }

    /// Weight gaps stay empty; nothing recorded elsewhere means none
    pub fn fill_policy(&self) -> FillPolicy {
        match self {
            TrackedMetric::Weight => FillPolicy::None,
            _ => FillPolicy::Zero,
        }
    }

    /// Field holding the range total in API responses
    pub fn total_field(&self) -> &'static str {
        match self {
            TrackedMetric::Water => "amountMl",
            TrackedMetric::Exercise => "totalMinutes",
            TrackedMetric::Calories => "totalKcal",
            TrackedMetric::Weight => "totalKg",
        }
    }

    pub fn aggregator(&self) -> DailyAggregator {
        DailyAggregator::new(self.combine_rule(), self.fill_policy())
    }
}

impl std::fmt::Display for TrackedMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TrackedMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(TrackedMetric::Water),
            "exercise" => Ok(TrackedMetric::Exercise),
            "calories" | "kcal" => Ok(TrackedMetric::Calories),
            "weight" => Ok(TrackedMetric::Weight),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// Metric name outside the catalogue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown metric: {0}. Use water, exercise, calories, or weight")]
pub struct UnknownMetric(pub String);
