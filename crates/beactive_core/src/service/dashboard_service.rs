//! Dashboard use-case service.
//!
//! # Responsibility
//! - Authorize once, then run the step, calorie and workout fetches.
//! - Turn aggregates into cards and write them into the shared store.
//!
//! # Invariants
//! - A failed fetch never touches records; it only marks its keys unavailable.
//! - The four workout cards are written in one store batch.
//! - Authorization denial leaves the store untouched.

use crate::aggregate::{AggregateError, AggregateResult, Aggregator};
use crate::config::DashboardConfig;
use crate::format::{format_decimal, format_minutes};
use crate::model::activity::{HealthDataType, QuantityKind, WorkoutCategory};
use crate::model::summary::{MetricKey, SummaryRecord};
use crate::source::HealthDataSource;
use crate::store::SummaryStore;
use crate::window::{Clock, SystemClock, TimeWindow};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Keys whose refresh failed, with the cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub keys: Vec<MetricKey>,
    pub error: AggregateError,
}

/// Outcome of one `refresh_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: Vec<MetricKey>,
    pub failed: Vec<RefreshFailure>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn record<T>(&mut self, keys: &[MetricKey], outcome: AggregateResult<T>) {
        match outcome {
            Ok(_) => self.updated.extend_from_slice(keys),
            Err(error) => self.failed.push(RefreshFailure {
                keys: keys.to_vec(),
                error,
            }),
        }
    }
}

/// Orchestrates fetches from a `HealthDataSource` into a `SummaryStore`.
pub struct DashboardService<S: HealthDataSource, C: Clock = SystemClock> {
    source: S,
    clock: C,
    store: Arc<SummaryStore>,
    config: DashboardConfig,
}

impl<S: HealthDataSource> DashboardService<S> {
    /// Creates a service reading the wall clock.
    pub fn new(source: S, store: Arc<SummaryStore>, config: DashboardConfig) -> Self {
        Self::with_clock(source, SystemClock, store, config)
    }
}

impl<S: HealthDataSource, C: Clock> DashboardService<S, C> {
    pub fn with_clock(
        source: S,
        clock: C,
        store: Arc<SummaryStore>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            source,
            clock,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SummaryStore> {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Startup flow: authorize once, then refresh every card.
    ///
    /// # Errors
    /// - `AuthorizationDenied` when read access is refused. No fetch runs.
    pub async fn start(&self) -> AggregateResult<RefreshReport> {
        let read: BTreeSet<HealthDataType> = HealthDataType::ALL.into_iter().collect();
        if let Err(err) = self.source.authorize(&read).await {
            error!(
                "event=authorization_denied module=dashboard status=error error={}",
                err
            );
            return Err(AggregateError::AuthorizationDenied(err));
        }
        info!(
            "event=authorization_granted module=dashboard status=ok types={}",
            read.len()
        );
        Ok(self.refresh_all().await)
    }

    /// Runs the three independent fetches concurrently.
    pub async fn refresh_all(&self) -> RefreshReport {
        let (steps, calories, workouts) = tokio::join!(
            self.refresh_today_steps(),
            self.refresh_today_calories(),
            self.refresh_workouts(),
        );

        let mut report = RefreshReport::default();
        report.record(&[MetricKey::TodaySteps], steps);
        report.record(&[MetricKey::TodayCalories], calories);
        report.record(&MetricKey::WORKOUTS, workouts);
        info!(
            "event=refresh_done module=dashboard status={} updated={} failed={}",
            if report.is_complete() { "ok" } else { "partial" },
            report.updated.len(),
            report.failed.len()
        );
        report
    }

    pub async fn refresh_today_steps(&self) -> AggregateResult<SummaryRecord> {
        self.refresh_daily_total(MetricKey::TodaySteps, QuantityKind::StepCount)
            .await
    }

    pub async fn refresh_today_calories(&self) -> AggregateResult<SummaryRecord> {
        self.refresh_daily_total(MetricKey::TodayCalories, QuantityKind::ActiveEnergy)
            .await
    }

    /// Fetches minutes for every tracked workout category.
    pub async fn refresh_workouts(&self) -> AggregateResult<Vec<SummaryRecord>> {
        let window = self.config.workout_window_at(&self.clock.now());
        let minutes = Aggregator::new(&self.source)
            .compute_workout_minutes(&window, &WorkoutCategory::TRACKED)
            .await
            .map_err(|err| self.fetch_failed(&MetricKey::WORKOUTS, &window, err))?;

        let cards: Vec<(MetricKey, SummaryRecord)> = minutes
            .iter()
            .filter_map(|(category, total)| {
                let key = MetricKey::for_workout(category)?;
                let record = SummaryRecord::for_metric(
                    key,
                    self.config.subtitle_for(key),
                    format_minutes(*total),
                );
                Some((key, record))
            })
            .collect();
        let records = cards.iter().map(|(_, record)| record.clone()).collect();
        self.store.upsert_all(cards);

        info!(
            "event=workouts_refreshed module=dashboard status=ok scope={} categories={}",
            self.config.workout_scope_label(),
            minutes.len()
        );
        Ok(records)
    }

    async fn refresh_daily_total(
        &self,
        key: MetricKey,
        quantity: QuantityKind,
    ) -> AggregateResult<SummaryRecord> {
        let window = TimeWindow::today(&self.clock.now());
        let total = Aggregator::new(&self.source)
            .compute_daily_total(quantity, &window)
            .await
            .map_err(|err| self.fetch_failed(&[key], &window, err))?;

        let record = SummaryRecord::for_metric(
            key,
            self.config.subtitle_for(key),
            format_decimal(total, self.config.locale),
        );
        self.store.upsert(key, record.clone());
        info!(
            "event=metric_refreshed module=dashboard status=ok key={}",
            key
        );
        Ok(record)
    }

    fn fetch_failed(
        &self,
        keys: &[MetricKey],
        window: &TimeWindow,
        err: AggregateError,
    ) -> AggregateError {
        let key_list = keys
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join(",");
        warn!(
            "event=fetch_failed module=dashboard status=error keys={} window={} error={}",
            key_list, window, err
        );
        self.store.mark_unavailable(keys);
        err
    }
}
