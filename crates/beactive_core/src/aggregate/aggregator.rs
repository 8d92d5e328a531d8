//! Aggregator over a `HealthDataSource`.

use crate::model::activity::{
    HealthDataType, QuantityKind, QuantitySample, WorkoutCategory, WorkoutSession,
};
use crate::source::{HealthDataSource, SourceError};
use crate::window::TimeWindow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SECONDS_PER_MINUTE: u64 = 60;

/// Whole minutes per workout category.
pub type WorkoutMinutes = BTreeMap<WorkoutCategory, u64>;

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Aggregation failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// Read access was refused at startup. Nothing can be displayed.
    AuthorizationDenied(SourceError),
    /// One query failed. The affected cards keep their last value.
    DataUnavailable {
        data_type: HealthDataType,
        source: SourceError,
    },
}

impl AggregateError {
    fn unavailable(data_type: HealthDataType, source: SourceError) -> Self {
        Self::DataUnavailable { data_type, source }
    }
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthorizationDenied(err) => write!(f, "authorization denied: {err}"),
            Self::DataUnavailable { data_type, source } => {
                write!(f, "{data_type} data unavailable: {source}")
            }
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AuthorizationDenied(err) => Some(err),
            Self::DataUnavailable { source, .. } => Some(source),
        }
    }
}

/// Computes aggregates by querying `source`.
pub struct Aggregator<'a, S: HealthDataSource> {
    source: &'a S,
}

impl<'a, S: HealthDataSource> Aggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Sum of all `quantity` sample values inside `window`.
    ///
    /// # Errors
    /// - `DataUnavailable` when the source denies or fails the query.
    pub async fn compute_daily_total(
        &self,
        quantity: QuantityKind,
        window: &TimeWindow,
    ) -> AggregateResult<f64> {
        self.source
            .query_windowed_sum(quantity, window)
            .await
            .map_err(|err| AggregateError::unavailable(quantity.data_type(), err))
    }

    /// Whole minutes per category over all sessions inside `window`.
    ///
    /// Every category in `categories` is present in the result, with `0` when
    /// no session matched. Sessions of other categories are ignored.
    ///
    /// # Errors
    /// - `DataUnavailable` when the source denies or fails the query.
    pub async fn compute_workout_minutes(
        &self,
        window: &TimeWindow,
        categories: &[WorkoutCategory],
    ) -> AggregateResult<WorkoutMinutes> {
        let sessions = self.query_sessions(window, None).await?;
        Ok(tally_workout_minutes(&sessions, categories))
    }

    /// Whole minutes for one category, using a filtered session query.
    ///
    /// # Errors
    /// - `DataUnavailable` when the source denies or fails the query.
    pub async fn compute_category_minutes(
        &self,
        category: &WorkoutCategory,
        window: &TimeWindow,
    ) -> AggregateResult<u64> {
        let sessions = self.query_sessions(window, Some(category)).await?;
        let tally = tally_workout_minutes(&sessions, std::slice::from_ref(category));
        Ok(tally.get(category).copied().unwrap_or(0))
    }

    async fn query_sessions(
        &self,
        window: &TimeWindow,
        category: Option<&WorkoutCategory>,
    ) -> AggregateResult<Vec<WorkoutSession>> {
        self.source
            .query_sessions(window, category)
            .await
            .map_err(|err| AggregateError::unavailable(HealthDataType::Workout, err))
    }
}

/// Sums `quantity` samples whose start lies inside `window`.
pub fn sum_quantity(samples: &[QuantitySample], quantity: QuantityKind, window: &TimeWindow) -> f64 {
    samples
        .iter()
        .filter(|sample| sample.kind == quantity && window.contains(sample.start))
        .map(|sample| sample.value)
        .sum()
}

/// Groups sessions by category and sums their whole minutes.
///
/// Totals saturate at `u64::MAX` instead of overflowing.
pub fn tally_workout_minutes(
    sessions: &[WorkoutSession],
    categories: &[WorkoutCategory],
) -> WorkoutMinutes {
    let mut minutes: WorkoutMinutes = categories
        .iter()
        .map(|category| (category.clone(), 0))
        .collect();
    for session in sessions {
        if let Some(total) = minutes.get_mut(&session.category) {
            *total = total.saturating_add(whole_minutes(session.duration_seconds));
        }
    }
    minutes
}

/// Truncating seconds-to-minutes conversion. Negative or non-finite input is 0.
pub fn whole_minutes(duration_seconds: f64) -> u64 {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }
    (duration_seconds.trunc() as u64) / SECONDS_PER_MINUTE
}
