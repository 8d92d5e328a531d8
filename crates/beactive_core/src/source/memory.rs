//! In-memory health data source.
//!
//! Backs fixtures, the CLI demo and the FFI bridge, where the platform side
//! hands over raw samples and the core answers queries over them.
//!
//! # Invariants
//! - Queries for a data type that was not granted fail with `Denied`.
//! - Types marked unavailable fail with `Unavailable` until cleared.

use crate::aggregate::sum_quantity;
use crate::model::activity::{
    HealthDataType, QuantityKind, QuantitySample, WorkoutCategory, WorkoutSession,
};
use crate::source::{HealthDataSource, SourceError, SourceResult};
use crate::window::TimeWindow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Serializable bundle of platform samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSnapshot {
    /// When set, `authorize` fails with `Denied`.
    pub authorization_denied: bool,
    pub quantity_samples: Vec<QuantitySample>,
    pub workouts: Vec<WorkoutSession>,
    /// Data types whose queries fail as if the store were unreachable.
    pub unavailable: Vec<HealthDataType>,
}

/// Fixture loading errors.
#[derive(Debug)]
pub enum SnapshotError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read snapshot `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid snapshot json: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl HealthSnapshot {
    pub fn from_json_str(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug, Default)]
struct SourceState {
    snapshot: HealthSnapshot,
    granted: BTreeSet<HealthDataType>,
    session_filters: Vec<Option<WorkoutCategory>>,
}

/// `HealthDataSource` answering queries from an in-memory snapshot.
#[derive(Debug, Default)]
pub struct InMemoryHealthSource {
    state: Mutex<SourceState>,
}

impl InMemoryHealthSource {
    pub fn new(snapshot: HealthSnapshot) -> Self {
        Self {
            state: Mutex::new(SourceState {
                snapshot,
                ..SourceState::default()
            }),
        }
    }

    /// Replaces the samples while keeping granted access.
    pub fn replace_snapshot(&self, snapshot: HealthSnapshot) -> SourceResult<()> {
        self.lock()?.snapshot = snapshot;
        Ok(())
    }

    pub fn push_quantity_sample(&self, sample: QuantitySample) -> SourceResult<()> {
        self.lock()?.snapshot.quantity_samples.push(sample);
        Ok(())
    }

    pub fn push_workout(&self, session: WorkoutSession) -> SourceResult<()> {
        self.lock()?.snapshot.workouts.push(session);
        Ok(())
    }

    /// Marks `data_type` reachable or unreachable for subsequent queries.
    pub fn set_available(&self, data_type: HealthDataType, available: bool) -> SourceResult<()> {
        let mut state = self.lock()?;
        state.snapshot.unavailable.retain(|value| *value != data_type);
        if !available {
            state.snapshot.unavailable.push(data_type);
        }
        Ok(())
    }

    /// Types granted by the last successful `authorize`.
    pub fn granted(&self) -> SourceResult<BTreeSet<HealthDataType>> {
        Ok(self.lock()?.granted.clone())
    }

    /// Category filters of every session query issued so far.
    pub fn session_filters(&self) -> SourceResult<Vec<Option<WorkoutCategory>>> {
        Ok(self.lock()?.session_filters.clone())
    }

    fn lock(&self) -> SourceResult<MutexGuard<'_, SourceState>> {
        self.state
            .lock()
            .map_err(|_| SourceError::Unavailable("source state lock poisoned".to_string()))
    }
}

impl SourceState {
    fn ensure_readable(&self, data_type: HealthDataType) -> SourceResult<()> {
        if !self.granted.contains(&data_type) {
            return Err(SourceError::Denied);
        }
        if self.snapshot.unavailable.contains(&data_type) {
            return Err(SourceError::Unavailable(format!(
                "{data_type} query failed"
            )));
        }
        Ok(())
    }
}

impl HealthDataSource for InMemoryHealthSource {
    async fn authorize(&self, read: &BTreeSet<HealthDataType>) -> SourceResult<()> {
        let mut state = self.lock()?;
        if state.snapshot.authorization_denied {
            state.granted.clear();
            return Err(SourceError::Denied);
        }
        state.granted.extend(read.iter().copied());
        debug!(
            "event=source_authorized module=source status=ok types={}",
            state.granted.len()
        );
        Ok(())
    }

    async fn query_windowed_sum(
        &self,
        quantity: QuantityKind,
        window: &TimeWindow,
    ) -> SourceResult<f64> {
        let state = self.lock()?;
        state.ensure_readable(quantity.data_type())?;
        Ok(sum_quantity(&state.snapshot.quantity_samples, quantity, window))
    }

    async fn query_sessions(
        &self,
        window: &TimeWindow,
        category: Option<&WorkoutCategory>,
    ) -> SourceResult<Vec<WorkoutSession>> {
        let mut state = self.lock()?;
        state.session_filters.push(category.cloned());
        state.ensure_readable(HealthDataType::Workout)?;
        Ok(state
            .snapshot
            .workouts
            .iter()
            .filter(|session| window.contains(session.start))
            .filter(|session| category.map_or(true, |wanted| &session.category == wanted))
            .cloned()
            .collect())
    }
}
