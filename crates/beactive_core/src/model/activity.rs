//! Raw health samples as delivered by the platform health store.
//!
//! # Invariants
//! - Quantity values are non-negative counts or kilocalories.
//! - Workout categories outside the tracked set are preserved as `Other`
//!   so they can be ignored, never rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Data types the dashboard asks read access for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthDataType {
    StepCount,
    ActiveEnergy,
    Workout,
}

impl HealthDataType {
    /// Every type read by the dashboard, in authorization order.
    pub const ALL: [HealthDataType; 3] = [Self::StepCount, Self::ActiveEnergy, Self::Workout];

    /// Stable string id used in logs and fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StepCount => "step_count",
            Self::ActiveEnergy => "active_energy",
            Self::Workout => "workout",
        }
    }
}

impl Display for HealthDataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative quantities that can be summed over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// Unit: count.
    StepCount,
    /// Unit: kilocalorie.
    ActiveEnergy,
}

impl QuantityKind {
    pub fn data_type(self) -> HealthDataType {
        match self {
            Self::StepCount => HealthDataType::StepCount,
            Self::ActiveEnergy => HealthDataType::ActiveEnergy,
        }
    }
}

/// One quantity sample covering `[start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    pub kind: QuantityKind,
    pub value: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuantitySample {
    /// Creates a sample whose start and end coincide.
    pub fn at(kind: QuantityKind, value: f64, instant: DateTime<Utc>) -> Self {
        Self {
            kind,
            value,
            start: instant,
            end: instant,
        }
    }
}

/// Workout activity category.
///
/// Serialized as a plain snake_case string; unknown strings map to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkoutCategory {
    Running,
    TraditionalStrengthTraining,
    Soccer,
    Basketball,
    Other(String),
}

impl WorkoutCategory {
    /// Categories the dashboard reports minutes for.
    pub const TRACKED: [WorkoutCategory; 4] = [
        Self::Running,
        Self::TraditionalStrengthTraining,
        Self::Soccer,
        Self::Basketball,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::TraditionalStrengthTraining => "traditional_strength_training",
            Self::Soccer => "soccer",
            Self::Basketball => "basketball",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn is_tracked(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for WorkoutCategory {
    fn from(value: String) -> Self {
        match value.trim() {
            "running" => Self::Running,
            "traditional_strength_training" => Self::TraditionalStrengthTraining,
            "soccer" => Self::Soccer,
            "basketball" => Self::Basketball,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for WorkoutCategory {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<WorkoutCategory> for String {
    fn from(value: WorkoutCategory) -> Self {
        match value {
            WorkoutCategory::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for WorkoutCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub category: WorkoutCategory,
    pub start: DateTime<Utc>,
    /// Elapsed duration; fractional seconds are dropped before aggregation.
    pub duration_seconds: f64,
}

impl WorkoutSession {
    pub fn new(
        category: impl Into<WorkoutCategory>,
        start: DateTime<Utc>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            category: category.into(),
            start,
            duration_seconds,
        }
    }
}
