//! Observable store of the latest summary card per metric.
//!
//! # Responsibility
//! - Hold the most recent `SummaryRecord` per `MetricKey`.
//! - Notify subscribers on every change with a whole snapshot.
//!
//! # Invariants
//! - Entries are replaced wholesale and never deleted.
//! - A batch write is observed atomically; partial batches never leak.

mod summary_store;

pub use summary_store::{StoreSubscription, SummarySnapshot, SummaryStore};
