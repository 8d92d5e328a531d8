//! Windowed aggregation of health samples.
//!
//! # Responsibility
//! - Reduce raw samples to scalar aggregates (sums, whole-minute totals).
//! - Translate source failures into the aggregation error taxonomy.
//!
//! # Invariants
//! - An empty window yields a zero aggregate, never an error.
//! - Session minutes truncate toward zero before summing.

mod aggregator;

pub use aggregator::{
    sum_quantity, tally_workout_minutes, whole_minutes, AggregateError, AggregateResult,
    Aggregator, WorkoutMinutes,
};
