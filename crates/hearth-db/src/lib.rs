//! Persistence contract for Hearth runs.
//!
//! The simulation core never performs I/O: each step returns the new
//! state and the caller persists it through a [`store::RunStore`]. This
//! crate defines that contract — run records, daily metrics, event
//! logs, and network snapshots — plus an in-memory implementation used
//! by tests and single-process embedding.
//!
//! `state_json` everywhere is the canonical `serde_json` rendering of
//! [`hearth_types::SimulationState`].

pub mod error;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryRunStore;
pub use store::{RunRecord, RunStore};
