//! Type-safe identifier wrappers.
//!
//! Agents are identified by a dense numeric ID assigned at spawn time
//! (1-based). The social network and all memory structures reference
//! agents by ID only, never by pointer, so state serialization stays
//! trivial and reference cycles cannot form.
//!
//! Run identifiers in the persistence contract use UUID v7 (time-ordered)
//! for efficient store indexing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an agent within one simulation run.
///
/// IDs are assigned sequentially starting at 1 when the population is
/// spawned, and are stable for the lifetime of the run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Create an agent ID from its numeric value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the inner numeric value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Unique identifier for a persisted simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new run identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_display_is_prefixed() {
        assert_eq!(AgentId::new(7).to_string(), "agent-7");
    }

    #[test]
    fn agent_id_serializes_as_number() {
        let json = serde_json::to_string(&AgentId::new(3)).unwrap_or_default();
        assert_eq!(json, "3");
    }

    #[test]
    fn run_id_roundtrip_serde() {
        let original = RunId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<RunId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }
}
