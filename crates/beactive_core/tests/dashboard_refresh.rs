mod common;

use beactive_core::{
    AggregateError, DashboardConfig, DashboardService, FixedClock, HealthDataSource,
    HealthDataType, HealthSnapshot, InMemoryHealthSource, MetricKey, SourceError, SummaryStore,
    WindowScope, WorkoutCategory,
};
use common::{clock, hours_before_noon, monday_morning, sample_snapshot, session, steps};
use std::collections::BTreeSet;
use std::sync::Arc;

fn service(
    snapshot: HealthSnapshot,
    config: DashboardConfig,
) -> DashboardService<InMemoryHealthSource, FixedClock> {
    DashboardService::with_clock(
        InMemoryHealthSource::new(snapshot),
        clock(),
        Arc::new(SummaryStore::new()),
        config,
    )
}

fn amount(store: &SummaryStore, key: MetricKey) -> Option<String> {
    store.get(key).map(|record| record.amount)
}

#[tokio::test]
async fn start_fills_every_card() {
    let dashboard = service(sample_snapshot(), DashboardConfig::default());

    let report = dashboard.start().await.expect("authorization granted");
    assert!(report.is_complete());
    assert_eq!(report.updated.len(), MetricKey::ALL.len());

    let store = dashboard.store();
    assert_eq!(amount(store, MetricKey::TodaySteps).as_deref(), Some("800"));
    assert_eq!(amount(store, MetricKey::TodayCalories).as_deref(), Some("420"));
    assert_eq!(
        amount(store, MetricKey::WeekRunning).as_deref(),
        Some("40 minutes")
    );
    assert_eq!(
        amount(store, MetricKey::WeekSoccer).as_deref(),
        Some("60 minutes")
    );
    assert_eq!(
        amount(store, MetricKey::WeekStrength).as_deref(),
        Some("0 minutes")
    );
    assert_eq!(
        amount(store, MetricKey::WeekBasketball).as_deref(),
        Some("0 minutes")
    );

    let ids: Vec<u32> = store
        .sorted_records()
        .iter()
        .map(|record| record.identifier)
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn cards_carry_fixed_presentation_and_goals() {
    let dashboard = service(sample_snapshot(), DashboardConfig::default());
    dashboard.start().await.expect("authorization granted");

    let steps = dashboard
        .store()
        .get(MetricKey::TodaySteps)
        .expect("steps card");
    assert_eq!(steps.title, "Today steps");
    assert_eq!(steps.subtitle, "Goal 10,000");
    assert_eq!(steps.icon.symbol_name(), "figure.walk");
    assert_eq!(steps.accent.as_str(), "green");

    let strength = dashboard
        .store()
        .get(MetricKey::WeekStrength)
        .expect("strength card");
    assert_eq!(strength.title, "Weight Lifting");
    assert_eq!(strength.subtitle, "This week");
}

#[tokio::test]
async fn empty_health_store_yields_zero_cards_not_omissions() {
    let dashboard = service(HealthSnapshot::default(), DashboardConfig::default());
    dashboard.start().await.expect("authorization granted");

    let store = dashboard.store();
    assert_eq!(store.len(), MetricKey::ALL.len());
    assert_eq!(amount(store, MetricKey::TodaySteps).as_deref(), Some("0"));
    assert_eq!(amount(store, MetricKey::TodayCalories).as_deref(), Some("0"));
    assert_eq!(
        amount(store, MetricKey::WeekRunning).as_deref(),
        Some("0 minutes")
    );
}

#[tokio::test]
async fn authorization_denied_leaves_store_empty() {
    let snapshot = HealthSnapshot {
        authorization_denied: true,
        ..sample_snapshot()
    };
    let dashboard = service(snapshot, DashboardConfig::default());
    let subscription = dashboard.store().subscribe();

    let err = dashboard
        .start()
        .await
        .expect_err("denied authorization must fail startup");
    assert_eq!(err, AggregateError::AuthorizationDenied(SourceError::Denied));
    assert!(dashboard.store().is_empty());
    assert!(!subscription.has_changed().expect("store alive"));
}

#[tokio::test]
async fn failed_fetch_keeps_last_known_value_and_later_success_overwrites_only_that_key() {
    let dashboard = service(sample_snapshot(), DashboardConfig::default());
    dashboard.start().await.expect("authorization granted");
    let before = dashboard.store().snapshot();

    let source = dashboard.source();
    source
        .set_available(HealthDataType::StepCount, false)
        .expect("toggle availability");
    source
        .push_quantity_sample(steps(200.0, hours_before_noon(1)))
        .expect("add sample");

    let report = dashboard.refresh_all().await;
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].keys, vec![MetricKey::TodaySteps]);
    assert!(matches!(
        report.failed[0].error,
        AggregateError::DataUnavailable {
            data_type: HealthDataType::StepCount,
            ..
        }
    ));

    let stale = dashboard.store().snapshot();
    assert_eq!(
        stale.get(MetricKey::TodaySteps),
        before.get(MetricKey::TodaySteps)
    );
    assert!(stale.is_unavailable(MetricKey::TodaySteps));
    assert!(!stale.is_unavailable(MetricKey::TodayCalories));

    source
        .set_available(HealthDataType::StepCount, true)
        .expect("toggle availability");
    let record = dashboard
        .refresh_today_steps()
        .await
        .expect("steps refresh succeeds");
    assert_eq!(record.amount, "1,000");

    let after = dashboard.store().snapshot();
    assert!(!after.is_unavailable(MetricKey::TodaySteps));
    for key in MetricKey::ALL {
        if key != MetricKey::TodaySteps {
            assert_eq!(after.get(key), stale.get(key), "{key} must be untouched");
        }
    }
}

#[tokio::test]
async fn workout_failure_marks_all_workout_cards_and_keeps_records() {
    let dashboard = service(sample_snapshot(), DashboardConfig::default());
    dashboard.start().await.expect("authorization granted");

    dashboard
        .source()
        .set_available(HealthDataType::Workout, false)
        .expect("toggle availability");
    let err = dashboard
        .refresh_workouts()
        .await
        .expect_err("workout query must fail");
    assert!(matches!(err, AggregateError::DataUnavailable { .. }));

    let snapshot = dashboard.store().snapshot();
    for key in MetricKey::WORKOUTS {
        assert!(snapshot.is_unavailable(key));
        assert!(snapshot.get(key).is_some());
    }
    assert_eq!(
        snapshot
            .get(MetricKey::WeekRunning)
            .map(|record| record.amount.as_str()),
        Some("40 minutes")
    );
    assert!(!snapshot.is_unavailable(MetricKey::TodaySteps));
}

#[tokio::test]
async fn workout_batch_is_published_as_one_change() {
    let dashboard = service(sample_snapshot(), DashboardConfig::default());
    let read: BTreeSet<HealthDataType> = HealthDataType::ALL.into_iter().collect();
    dashboard
        .source()
        .authorize(&read)
        .await
        .expect("authorize");

    let mut subscription = dashboard.store().subscribe();
    dashboard.refresh_workouts().await.expect("workouts refresh");

    assert!(subscription.has_changed().expect("store alive"));
    let seen = subscription.borrow_and_update().clone();
    assert_eq!(seen.len(), MetricKey::WORKOUTS.len());
    assert!(!subscription.has_changed().expect("store alive"));
}

#[tokio::test]
async fn today_scope_excludes_earlier_days_and_relabels_cards() {
    let mut snapshot = sample_snapshot();
    snapshot
        .workouts
        .push(session(WorkoutCategory::Running, monday_morning(), 900.0));

    let week = service(snapshot.clone(), DashboardConfig::default());
    week.start().await.expect("authorization granted");
    assert_eq!(
        amount(week.store(), MetricKey::WeekRunning).as_deref(),
        Some("55 minutes")
    );

    let today_config = DashboardConfig {
        workout_window: WindowScope::Today,
        ..DashboardConfig::default()
    };
    let today = service(snapshot, today_config);
    today.start().await.expect("authorization granted");
    let running = today
        .store()
        .get(MetricKey::WeekRunning)
        .expect("running card");
    assert_eq!(running.amount, "40 minutes");
    assert_eq!(running.subtitle, "Today");
}
