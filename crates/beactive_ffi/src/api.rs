//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Accept raw platform samples from Dart and refresh the dashboard cards.
//! - Keep one process-wide store so failed refreshes keep last-known values.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Cards are always returned sorted by identifier.
//! - Invalid input is rejected before the store is touched.

use beactive_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DashboardConfig, DashboardService, HealthDataType, HealthSnapshot, InMemoryHealthSource,
    QuantityKind, QuantitySample, SummarySnapshot, SummaryStore, WorkoutSession,
};
use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use std::sync::{Arc, Mutex, OnceLock};

static DASHBOARD_STORE: OnceLock<Arc<SummaryStore>> = OnceLock::new();
static DASHBOARD_CONFIG: OnceLock<Mutex<DashboardConfig>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One quantity sample read by the platform plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSampleInput {
    /// `step_count` or `active_energy`.
    pub kind: String,
    pub value: f64,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
}

/// One workout session read by the platform plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutInput {
    /// Snake_case activity type, e.g. `running`. Unknown values are ignored
    /// by aggregation.
    pub category: String,
    pub start_epoch_ms: i64,
    pub duration_seconds: f64,
}

/// Refresh request carrying everything the platform read this round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardRefreshRequest {
    /// Whether the user granted read access.
    pub authorized: bool,
    pub samples: Vec<HealthSampleInput>,
    pub workouts: Vec<WorkoutInput>,
    /// Data types whose platform query failed (`step_count|active_energy|workout`).
    pub unavailable: Vec<String>,
}

/// Card projection for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCard {
    /// Stable store key, e.g. `todaySteps`.
    pub key: String,
    pub identifier: u32,
    pub title: String,
    pub subtitle: String,
    /// Platform symbol name.
    pub icon: String,
    pub accent: String,
    pub amount: String,
    /// `false` when the last refresh of this card failed.
    pub available: bool,
}

/// Response envelope for dashboard calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub cards: Vec<DashboardCard>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Replaces the dashboard config from a JSON document.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
/// - Applies to subsequent refresh calls.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_configure(config_json: String) -> String {
    let config = match DashboardConfig::from_json_str(&config_json) {
        Ok(config) => config,
        Err(err) => return format!("dashboard_configure failed: {err}"),
    };
    match dashboard_config().lock() {
        Ok(mut active) => {
            *active = config;
            String::new()
        }
        Err(_) => "dashboard_configure failed: config lock poisoned".to_string(),
    }
}

/// Runs authorization and every fetch over the given platform samples.
///
/// # FFI contract
/// - Sync call; runs the async flow on a short-lived current-thread runtime.
/// - Never panics.
/// - On failure, cards hold the last-known values with `available=false`
///   for the failed ones.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_refresh(request: DashboardRefreshRequest) -> DashboardResponse {
    let config = match dashboard_config().lock() {
        Ok(active) => active.clone(),
        Err(_) => return failure(dashboard_store(), "config lock poisoned"),
    };
    refresh_into(dashboard_store(), config, request)
}

/// Current cards without refreshing.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_cards() -> DashboardResponse {
    let snapshot = dashboard_store().snapshot();
    let message = format!("{} card(s).", snapshot.len());
    DashboardResponse {
        ok: true,
        cards: to_cards(&snapshot),
        message,
    }
}

/// Sample cards for UI previews. Does not touch the live store.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_preview_cards() -> DashboardResponse {
    let config = dashboard_config()
        .lock()
        .map(|active| active.clone())
        .unwrap_or_default();
    let preview = SummaryStore::preview(&config);
    DashboardResponse {
        ok: true,
        cards: to_cards(&preview.snapshot()),
        message: "Preview cards.".to_string(),
    }
}

fn refresh_into(
    store: &Arc<SummaryStore>,
    config: DashboardConfig,
    request: DashboardRefreshRequest,
) -> DashboardResponse {
    let snapshot = match to_snapshot(request) {
        Ok(snapshot) => snapshot,
        Err(message) => return failure(store, &message),
    };
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(err) => return failure(store, &format!("runtime init failed: {err}")),
    };

    let service = DashboardService::new(
        InMemoryHealthSource::new(snapshot),
        Arc::clone(store),
        config,
    );
    match runtime.block_on(service.start()) {
        Ok(report) => {
            let message = if report.is_complete() {
                "Dashboard refreshed.".to_string()
            } else {
                let failed = report
                    .failed
                    .iter()
                    .map(|failure| failure.error.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("Dashboard partially refreshed: {failed}")
            };
            DashboardResponse {
                ok: report.is_complete(),
                cards: to_cards(&store.snapshot()),
                message,
            }
        }
        Err(err) => failure(store, &err.to_string()),
    }
}

fn failure(store: &SummaryStore, reason: &str) -> DashboardResponse {
    warn!(
        "event=dashboard_refresh module=ffi status=error reason={}",
        reason
    );
    DashboardResponse {
        ok: false,
        cards: to_cards(&store.snapshot()),
        message: format!("dashboard_refresh failed: {reason}"),
    }
}

fn to_snapshot(request: DashboardRefreshRequest) -> Result<HealthSnapshot, String> {
    let quantity_samples = request
        .samples
        .into_iter()
        .map(|sample| -> Result<QuantitySample, String> {
            Ok(QuantitySample {
                kind: parse_quantity_kind(&sample.kind)?,
                value: sample.value,
                start: epoch_ms_to_utc(sample.start_epoch_ms)?,
                end: epoch_ms_to_utc(sample.end_epoch_ms)?,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;
    let workouts = request
        .workouts
        .into_iter()
        .map(|workout| -> Result<WorkoutSession, String> {
            Ok(WorkoutSession::new(
                workout.category,
                epoch_ms_to_utc(workout.start_epoch_ms)?,
                workout.duration_seconds,
            ))
        })
        .collect::<Result<Vec<_>, String>>()?;
    let unavailable = request
        .unavailable
        .iter()
        .map(String::as_str)
        .map(parse_data_type)
        .collect::<Result<Vec<_>, String>>()?;

    Ok(HealthSnapshot {
        authorization_denied: !request.authorized,
        quantity_samples,
        workouts,
        unavailable,
    })
}

fn parse_quantity_kind(value: &str) -> Result<QuantityKind, String> {
    match parse_data_type(value)? {
        HealthDataType::StepCount => Ok(QuantityKind::StepCount),
        HealthDataType::ActiveEnergy => Ok(QuantityKind::ActiveEnergy),
        HealthDataType::Workout => Err("`workout` is not a quantity sample kind".to_string()),
    }
}

fn parse_data_type(value: &str) -> Result<HealthDataType, String> {
    let normalized = value.trim();
    HealthDataType::ALL
        .into_iter()
        .find(|data_type| data_type.as_str() == normalized)
        .ok_or_else(|| format!("unsupported health data type `{normalized}`"))
}

fn epoch_ms_to_utc(epoch_ms: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .ok_or_else(|| format!("epoch millis out of range: {epoch_ms}"))
}

fn to_cards(snapshot: &SummarySnapshot) -> Vec<DashboardCard> {
    let mut cards: Vec<DashboardCard> = snapshot
        .keys()
        .filter_map(|key| snapshot.get(key).map(|record| (key, record)))
        .map(|(key, record)| DashboardCard {
            key: key.as_str().to_string(),
            identifier: record.identifier,
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            icon: record.icon.symbol_name().to_string(),
            accent: record.accent.as_str().to_string(),
            amount: record.amount.clone(),
            available: !snapshot.is_unavailable(key),
        })
        .collect();
    cards.sort_by_key(|card| card.identifier);
    cards
}

fn dashboard_store() -> &'static Arc<SummaryStore> {
    DASHBOARD_STORE.get_or_init(|| Arc::new(SummaryStore::new()))
}

fn dashboard_config() -> &'static Mutex<DashboardConfig> {
    DASHBOARD_CONFIG.get_or_init(|| Mutex::new(DashboardConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, dashboard_configure, dashboard_preview_cards, dashboard_refresh,
        init_logging, ping, refresh_into, DashboardRefreshRequest, HealthSampleInput,
        WorkoutInput,
    };
    use beactive_core::{DashboardConfig, MetricKey, SummaryStore};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn minutes_ago_ms(minutes: i64) -> i64 {
        (Utc::now() - Duration::minutes(minutes)).timestamp_millis()
    }

    fn request() -> DashboardRefreshRequest {
        DashboardRefreshRequest {
            authorized: true,
            samples: vec![
                HealthSampleInput {
                    kind: "step_count".to_string(),
                    value: 500.0,
                    start_epoch_ms: minutes_ago_ms(0),
                    end_epoch_ms: minutes_ago_ms(0),
                },
                HealthSampleInput {
                    kind: "step_count".to_string(),
                    value: 300.0,
                    start_epoch_ms: minutes_ago_ms(0),
                    end_epoch_ms: minutes_ago_ms(0),
                },
            ],
            workouts: vec![WorkoutInput {
                category: "running".to_string(),
                start_epoch_ms: minutes_ago_ms(0),
                duration_seconds: 1800.0,
            }],
            unavailable: Vec::new(),
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn refresh_returns_sorted_cards() {
        let store = Arc::new(SummaryStore::new());
        let response = refresh_into(&store, DashboardConfig::default(), request());
        assert!(response.ok, "{}", response.message);

        let ids: Vec<u32> = response.cards.iter().map(|card| card.identifier).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(response.cards[0].amount, "800");
        assert_eq!(response.cards[0].icon, "figure.walk");
        assert_eq!(
            MetricKey::parse(&response.cards[2].key),
            Some(MetricKey::WeekRunning)
        );
        assert_eq!(response.cards[2].amount, "30 minutes");
        assert!(response.cards.iter().all(|card| card.available));
    }

    #[test]
    fn unauthorized_refresh_leaves_store_empty() {
        let store = Arc::new(SummaryStore::new());
        let response = refresh_into(
            &store,
            DashboardConfig::default(),
            DashboardRefreshRequest {
                authorized: false,
                ..request()
            },
        );
        assert!(!response.ok);
        assert!(response.cards.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn failed_type_keeps_previous_card_marked_unavailable() {
        let store = Arc::new(SummaryStore::new());
        refresh_into(&store, DashboardConfig::default(), request());

        let mut second = request();
        second.samples.clear();
        second.unavailable = vec!["step_count".to_string()];
        let response = refresh_into(&store, DashboardConfig::default(), second);

        assert!(!response.ok);
        let steps = &response.cards[0];
        assert_eq!(steps.key, "todaySteps");
        assert_eq!(steps.amount, "800");
        assert!(!steps.available);
        assert!(response.cards[1..].iter().all(|card| card.available));
    }

    #[test]
    fn huge_workout_durations_refresh_without_panicking() {
        let store = Arc::new(SummaryStore::new());
        let mut huge = request();
        huge.workouts = (0..61)
            .map(|_| WorkoutInput {
                category: "running".to_string(),
                start_epoch_ms: minutes_ago_ms(0),
                duration_seconds: 1e300,
            })
            .collect();

        let response = refresh_into(&store, DashboardConfig::default(), huge);

        assert!(response.ok, "{}", response.message);
        assert_eq!(
            response.cards[2].amount,
            format!("{} minutes", u64::MAX)
        );
    }

    #[test]
    fn invalid_sample_kind_is_rejected() {
        let mut bad = request();
        bad.samples[0].kind = "heart_rate".to_string();
        let response = dashboard_refresh(bad);
        assert!(!response.ok);
        assert!(response.message.contains("heart_rate"));
    }

    #[test]
    fn configure_rejects_invalid_json() {
        let error = dashboard_configure("{ \"step_goal\": 0 }".to_string());
        assert!(error.contains("step_goal"));
    }

    #[test]
    fn preview_cards_are_available() {
        let response = dashboard_preview_cards();
        assert!(response.ok);
        assert_eq!(response.cards.len(), 2);
        assert_eq!(response.cards[1].amount, "1,241");
    }
}
