//! In-memory `RunStore` implementation.
//!
//! Backs tests and single-process embedding. All collections live
//! behind one async mutex; contention is irrelevant at simulation
//! scale (one writer, occasional readers).

use std::collections::BTreeMap;

use chrono::Utc;
use hearth_types::enums::RunStatus;
use hearth_types::ids::RunId;
use hearth_types::outputs::{DailyMetrics, NetworkStats, SimulationLogEntry};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{RunRecord, RunStore};

/// One persisted network snapshot row.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSnapshotRow {
    /// The day the snapshot describes.
    pub day: u64,

    /// Graph statistics for the day.
    pub stats: NetworkStats,

    /// JSON rendering of the edge list.
    pub edges_json: String,
}

#[derive(Debug, Default)]
struct Inner {
    runs: BTreeMap<RunId, RunRecord>,
    metrics: BTreeMap<RunId, Vec<DailyMetrics>>,
    events: BTreeMap<RunId, Vec<SimulationLogEntry>>,
    snapshots: BTreeMap<RunId, Vec<NetworkSnapshotRow>>,
}

/// An in-memory run store.
#[derive(Debug, Default)]
pub struct MemoryRunStore {
    inner: Mutex<Inner>,
}

impl MemoryRunStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All metrics appended for a run, in append order.
    pub async fn metrics_for(&self, run_id: RunId) -> Vec<DailyMetrics> {
        self.inner
            .lock()
            .await
            .metrics
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// All events appended for a run, in append order.
    pub async fn events_for(&self, run_id: RunId) -> Vec<SimulationLogEntry> {
        self.inner
            .lock()
            .await
            .events
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// All network snapshots appended for a run, in append order.
    pub async fn snapshots_for(&self, run_id: RunId) -> Vec<NetworkSnapshotRow> {
        self.inner
            .lock()
            .await
            .snapshots
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrite a run's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    pub async fn set_status(&self, run_id: RunId, status: RunStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .runs
            .get_mut(&run_id)
            .ok_or(StoreError::RunNotFound { run_id })?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(())
    }
}

impl RunStore for MemoryRunStore {
    async fn insert_run(
        &self,
        scenario: &str,
        seed: u32,
        state_json: &str,
    ) -> Result<RunId, StoreError> {
        let run_id = RunId::new();
        let now = Utc::now();
        let record = RunRecord {
            run_id,
            scenario: String::from(scenario),
            seed,
            status: RunStatus::Running,
            current_day: 0,
            state_json: String::from(state_json),
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().await.runs.insert(run_id, record);
        debug!(%run_id, scenario, seed, "run inserted");
        Ok(run_id)
    }

    async fn load_run(&self, run_id: RunId) -> Result<RunRecord, StoreError> {
        self.inner
            .lock()
            .await
            .runs
            .get(&run_id)
            .cloned()
            .ok_or(StoreError::RunNotFound { run_id })
    }

    async fn patch_run_state(
        &self,
        run_id: RunId,
        state_json: &str,
        day: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .runs
            .get_mut(&run_id)
            .ok_or(StoreError::RunNotFound { run_id })?;
        record.state_json = String::from(state_json);
        record.current_day = day;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn append_daily_metrics(
        &self,
        run_id: RunId,
        day: u64,
        metrics: &DailyMetrics,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.runs.contains_key(&run_id) {
            return Err(StoreError::RunNotFound { run_id });
        }
        debug!(%run_id, day, "metrics appended");
        inner.metrics.entry(run_id).or_default().push(metrics.clone());
        Ok(())
    }

    async fn append_events(
        &self,
        run_id: RunId,
        events: &[SimulationLogEntry],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.runs.contains_key(&run_id) {
            return Err(StoreError::RunNotFound { run_id });
        }
        inner
            .events
            .entry(run_id)
            .or_default()
            .extend(events.iter().cloned());
        Ok(())
    }

    async fn append_network_snapshot(
        &self,
        run_id: RunId,
        day: u64,
        stats: &NetworkStats,
        edges_json: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.runs.contains_key(&run_id) {
            return Err(StoreError::RunNotFound { run_id });
        }
        inner.snapshots.entry(run_id).or_default().push(NetworkSnapshotRow {
            day,
            stats: *stats,
            edges_json: String::from(edges_json),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn metrics(day: u64) -> DailyMetrics {
        DailyMetrics {
            day,
            cooperation_rate: 0.5,
            energy_balance: 1.25,
            risk_incidents: 1,
            inequality_index: 0.8,
            assortativity: 0.5,
            reciprocity: 0.0,
        }
    }

    #[tokio::test]
    async fn insert_and_load_roundtrip() {
        let store = MemoryRunStore::new();
        let run_id = store
            .insert_run("river_band", 42, "{\"day\":0}")
            .await
            .unwrap();

        let record = store.load_run(run_id).await.unwrap();
        assert_eq!(record.scenario, "river_band");
        assert_eq!(record.seed, 42);
        assert_eq!(record.status, RunStatus::Running);
        assert_eq!(record.current_day, 0);
        assert_eq!(record.state_json, "{\"day\":0}");
    }

    #[tokio::test]
    async fn load_unknown_run_fails() {
        let store = MemoryRunStore::new();
        let result = store.load_run(RunId::new()).await;
        assert!(matches!(result, Err(StoreError::RunNotFound { .. })));
    }

    #[tokio::test]
    async fn patch_updates_state_and_day() {
        let store = MemoryRunStore::new();
        let run_id = store.insert_run("river_band", 42, "{}").await.unwrap();

        store
            .patch_run_state(run_id, "{\"day\":3}", 3)
            .await
            .unwrap();

        let record = store.load_run(run_id).await.unwrap();
        assert_eq!(record.current_day, 3);
        assert_eq!(record.state_json, "{\"day\":3}");
    }

    #[tokio::test]
    async fn appends_accumulate_in_order() {
        let store = MemoryRunStore::new();
        let run_id = store.insert_run("river_band", 42, "{}").await.unwrap();

        store.append_daily_metrics(run_id, 1, &metrics(1)).await.unwrap();
        store.append_daily_metrics(run_id, 2, &metrics(2)).await.unwrap();

        let stored = store.metrics_for(run_id).await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.first().map(|m| m.day), Some(1));
        assert_eq!(stored.last().map(|m| m.day), Some(2));
    }

    #[tokio::test]
    async fn appends_to_unknown_run_fail() {
        let store = MemoryRunStore::new();
        let ghost = RunId::new();
        assert!(store.append_daily_metrics(ghost, 1, &metrics(1)).await.is_err());
        assert!(store.append_events(ghost, &[]).await.is_err());
        let stats = NetworkStats {
            reciprocity: 0.0,
            assortativity: 0.5,
            clustering: 0.0,
            edge_count: 0,
        };
        assert!(store
            .append_network_snapshot(ghost, 1, &stats, "[]")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn status_is_caller_owned() {
        let store = MemoryRunStore::new();
        let run_id = store.insert_run("river_band", 42, "{}").await.unwrap();

        store.set_status(run_id, RunStatus::Paused).await.unwrap();
        assert_eq!(
            store.load_run(run_id).await.unwrap().status,
            RunStatus::Paused
        );

        store.set_status(run_id, RunStatus::Completed).await.unwrap();
        assert_eq!(
            store.load_run(run_id).await.unwrap().status,
            RunStatus::Completed
        );
    }
}
