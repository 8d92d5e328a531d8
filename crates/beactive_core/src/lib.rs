//! Core domain logic for the BeActive dashboard.
//! This crate is the single source of truth for how health samples become
//! summary cards.

pub mod aggregate;
pub mod config;
pub mod format;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;
pub mod store;
pub mod window;

pub use aggregate::{
    sum_quantity, tally_workout_minutes, whole_minutes, AggregateError, AggregateResult,
    Aggregator, WorkoutMinutes,
};
pub use config::{ConfigError, DashboardConfig, WindowScope};
pub use format::{format_decimal, format_minutes, NumberLocale};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{
    HealthDataType, QuantityKind, QuantitySample, WorkoutCategory, WorkoutSession,
};
pub use model::summary::{AccentColor, ActivityIcon, MetricKey, SummaryRecord};
pub use service::dashboard_service::{DashboardService, RefreshFailure, RefreshReport};
pub use source::{
    HealthDataSource, HealthSnapshot, InMemoryHealthSource, SnapshotError, SourceError,
    SourceResult,
};
pub use store::{StoreSubscription, SummarySnapshot, SummaryStore};
pub use window::{Clock, FixedClock, SystemClock, TimeWindow, WeekStart, WindowError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
