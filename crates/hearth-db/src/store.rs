//! The `RunStore` contract.

use chrono::{DateTime, Utc};
use hearth_types::enums::RunStatus;
use hearth_types::ids::RunId;
use hearth_types::outputs::{DailyMetrics, NetworkStats, SimulationLogEntry};

use crate::error::StoreError;

/// One persisted run as the store returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// The run's identifier.
    pub run_id: RunId,

    /// The scenario the run was created from.
    pub scenario: String,

    /// The seed the run was created with.
    pub seed: u32,

    /// Lifecycle status, owned by the store's callers.
    pub status: RunStatus,

    /// The last persisted day.
    pub current_day: u64,

    /// Canonical JSON rendering of the latest `SimulationState`.
    pub state_json: String,

    /// When the run was created.
    pub created_at: DateTime<Utc>,

    /// When the run state was last patched.
    pub updated_at: DateTime<Utc>,
}

/// Storage contract for simulation runs.
///
/// Implementations persist run records, per-day metrics, event logs,
/// and network snapshots. The simulation core never calls a store
/// directly — the embedding application drives both. Callers hold
/// concrete store types (the contract is not used via dyn dispatch),
/// so plain `async fn` methods are sufficient here.
#[allow(async_fn_in_trait)]
pub trait RunStore {
    /// Create a run record at day 0 with [`RunStatus::Running`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the insert fails.
    async fn insert_run(
        &self,
        scenario: &str,
        seed: u32,
        state_json: &str,
    ) -> Result<RunId, StoreError>;

    /// Load a run record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    async fn load_run(&self, run_id: RunId) -> Result<RunRecord, StoreError>;

    /// Replace the run's state JSON and current day.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    async fn patch_run_state(
        &self,
        run_id: RunId,
        state_json: &str,
        day: u64,
    ) -> Result<(), StoreError>;

    /// Append one day's metrics.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    async fn append_daily_metrics(
        &self,
        run_id: RunId,
        day: u64,
        metrics: &DailyMetrics,
    ) -> Result<(), StoreError>;

    /// Append a batch of event log entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    async fn append_events(
        &self,
        run_id: RunId,
        events: &[SimulationLogEntry],
    ) -> Result<(), StoreError>;

    /// Append one day's network statistics and edge list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RunNotFound`] for an unknown id.
    async fn append_network_snapshot(
        &self,
        run_id: RunId,
        day: u64,
        stats: &NetworkStats,
        edges_json: &str,
    ) -> Result<(), StoreError>;
}
