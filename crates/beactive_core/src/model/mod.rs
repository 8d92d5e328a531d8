//! Domain model for health samples and display-ready summaries.
//!
//! # Responsibility
//! - Define the raw sample shapes delivered by a health data source.
//! - Define the closed set of summary cards the dashboard renders.
//!
//! # Invariants
//! - Store keys, icons and accent colors are closed variant sets.
//! - A `SummaryRecord` carries an already formatted amount; no series.

pub mod activity;
pub mod summary;
