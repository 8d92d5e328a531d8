//! Health data source contract.
//!
//! # Responsibility
//! - Describe the only boundary the aggregator talks to: authorize once,
//!   then run windowed sum and session queries.
//! - Keep platform specifics (HealthKit, Health Connect, fixtures) behind
//!   one trait.
//!
//! # Invariants
//! - Every query future completes exactly once, with a value or an error.
//! - Sums over an empty window are `Ok(0.0)`, never an error.

use crate::model::activity::{HealthDataType, QuantityKind, WorkoutCategory, WorkoutSession};
use crate::window::TimeWindow;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;

pub use memory::{HealthSnapshot, InMemoryHealthSource, SnapshotError};

/// Failure reported by a health data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The user or platform refused read access.
    Denied,
    /// The query could not be answered right now.
    Unavailable(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied => write!(f, "health data access denied"),
            Self::Unavailable(reason) => write!(f, "health data unavailable: {reason}"),
        }
    }
}

impl Error for SourceError {}

pub type SourceResult<T> = Result<T, SourceError>;

/// Platform health store used by the aggregator.
pub trait HealthDataSource {
    /// Requests read access for `read`. Called once at startup.
    async fn authorize(&self, read: &BTreeSet<HealthDataType>) -> SourceResult<()>;

    /// Sums all `quantity` samples whose start lies inside `window`.
    async fn query_windowed_sum(
        &self,
        quantity: QuantityKind,
        window: &TimeWindow,
    ) -> SourceResult<f64>;

    /// Lists workout sessions starting inside `window`, optionally limited to
    /// one category.
    async fn query_sessions(
        &self,
        window: &TimeWindow,
        category: Option<&WorkoutCategory>,
    ) -> SourceResult<Vec<WorkoutSession>>;
}
