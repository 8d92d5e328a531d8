use crate::config::DashboardConfig;
use crate::format::format_decimal;
use crate::model::summary::{MetricKey, SummaryRecord};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::watch;

const PREVIEW_STEPS: f64 = 12_123.0;
const PREVIEW_CALORIES: f64 = 1_241.0;

/// Point-in-time view of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarySnapshot {
    records: BTreeMap<MetricKey, SummaryRecord>,
    unavailable: BTreeSet<MetricKey>,
}

impl SummarySnapshot {
    pub fn get(&self, key: MetricKey) -> Option<&SummaryRecord> {
        self.records.get(&key)
    }

    /// Records ordered by `identifier`.
    pub fn sorted_records(&self) -> Vec<SummaryRecord> {
        let mut records: Vec<SummaryRecord> = self.records.values().cloned().collect();
        records.sort_by_key(|record| record.identifier);
        records
    }

    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.records.keys().copied()
    }

    /// Whether the most recent refresh of `key` failed.
    pub fn is_unavailable(&self, key: MetricKey) -> bool {
        self.unavailable.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Receiver that observes every store change.
pub type StoreSubscription = watch::Receiver<SummarySnapshot>;

/// Shared keyed collection of summary cards.
///
/// All writes funnel through one `watch` sender, so concurrent writers are
/// serialized and subscribers only ever see complete snapshots.
#[derive(Debug)]
pub struct SummaryStore {
    sender: watch::Sender<SummarySnapshot>,
}

impl Default for SummaryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryStore {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(SummarySnapshot::default());
        Self { sender }
    }

    /// Store pre-filled with sample cards for UI previews.
    pub fn preview(config: &DashboardConfig) -> Self {
        let store = Self::new();
        store.upsert_all([
            (
                MetricKey::TodaySteps,
                SummaryRecord::for_metric(
                    MetricKey::TodaySteps,
                    config.subtitle_for(MetricKey::TodaySteps),
                    format_decimal(PREVIEW_STEPS, config.locale),
                ),
            ),
            (
                MetricKey::TodayCalories,
                SummaryRecord::for_metric(
                    MetricKey::TodayCalories,
                    config.subtitle_for(MetricKey::TodayCalories),
                    format_decimal(PREVIEW_CALORIES, config.locale),
                ),
            ),
        ]);
        store
    }

    /// Replaces the record for `key` and clears its unavailable mark.
    pub fn upsert(&self, key: MetricKey, record: SummaryRecord) {
        self.upsert_all([(key, record)]);
    }

    /// Replaces several records with a single notification.
    pub fn upsert_all(&self, records: impl IntoIterator<Item = (MetricKey, SummaryRecord)>) {
        let records: Vec<(MetricKey, SummaryRecord)> = records.into_iter().collect();
        if records.is_empty() {
            return;
        }
        self.sender.send_modify(|snapshot| {
            for (key, record) in records {
                snapshot.unavailable.remove(&key);
                snapshot.records.insert(key, record);
            }
        });
    }

    /// Flags `keys` as failed without touching their records.
    ///
    /// Subscribers are notified only when a flag actually changes.
    pub fn mark_unavailable(&self, keys: &[MetricKey]) {
        self.sender.send_if_modified(|snapshot| {
            let mut changed = false;
            for key in keys {
                changed |= snapshot.unavailable.insert(*key);
            }
            changed
        });
    }

    pub fn get(&self, key: MetricKey) -> Option<SummaryRecord> {
        self.sender.borrow().get(key).cloned()
    }

    pub fn snapshot(&self) -> SummarySnapshot {
        self.sender.borrow().clone()
    }

    pub fn sorted_records(&self) -> Vec<SummaryRecord> {
        self.sender.borrow().sorted_records()
    }

    pub fn subscribe(&self) -> StoreSubscription {
        self.sender.subscribe()
    }

    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }
}
