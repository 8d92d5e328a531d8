#![allow(dead_code)]

use beactive_core::{
    FixedClock, HealthSnapshot, QuantityKind, QuantitySample, WorkoutCategory, WorkoutSession,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};

/// Wednesday noon, local time.
pub fn local_noon() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 10, 14, 12, 0, 0)
        .earliest()
        .expect("local noon should exist")
}

pub fn clock() -> FixedClock {
    FixedClock::new(local_noon())
}

/// Instant `hours` before local noon.
pub fn hours_before_noon(hours: i64) -> DateTime<Utc> {
    (local_noon() - Duration::hours(hours)).with_timezone(&Utc)
}

/// Monday 09:00 local of the same week.
pub fn monday_morning() -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2026, 10, 12, 9, 0, 0)
        .earliest()
        .expect("monday morning should exist")
        .with_timezone(&Utc)
}

pub fn steps(value: f64, at: DateTime<Utc>) -> QuantitySample {
    QuantitySample::at(QuantityKind::StepCount, value, at)
}

pub fn energy(value: f64, at: DateTime<Utc>) -> QuantitySample {
    QuantitySample::at(QuantityKind::ActiveEnergy, value, at)
}

pub fn session(category: WorkoutCategory, at: DateTime<Utc>, seconds: f64) -> WorkoutSession {
    WorkoutSession::new(category, at, seconds)
}

/// 800 steps, 420.4 kcal, running 40 min, soccer 60 min, one yoga session.
pub fn sample_snapshot() -> HealthSnapshot {
    HealthSnapshot {
        quantity_samples: vec![
            steps(500.0, hours_before_noon(3)),
            steps(300.0, hours_before_noon(1)),
            energy(300.2, hours_before_noon(3)),
            energy(120.2, hours_before_noon(2)),
        ],
        workouts: vec![
            session(WorkoutCategory::Running, hours_before_noon(4), 1800.0),
            session(WorkoutCategory::Running, hours_before_noon(2), 600.0),
            session(WorkoutCategory::Soccer, hours_before_noon(1), 3600.0),
            session(WorkoutCategory::from("yoga"), hours_before_noon(1), 2400.0),
        ],
        ..HealthSnapshot::default()
    }
}
