//! Per-day event log collection.
//!
//! The logger buffers [`SimulationLogEntry`] records during a step and
//! hands them back on flush. Scenario logging toggles decide which
//! event kinds are recorded at all; everything recorded is also mirrored
//! to `tracing` so operators see events live.

use hearth_types::config::LoggingConfig;
use hearth_types::ids::AgentId;
use hearth_types::outputs::SimulationLogEntry;
use tracing::info;

/// Buffers one day's event log.
#[derive(Debug, Clone)]
pub struct DayLogger {
    toggles: LoggingConfig,
    entries: Vec<SimulationLogEntry>,
}

impl DayLogger {
    /// Create a logger honoring the scenario's toggles.
    pub const fn new(toggles: LoggingConfig) -> Self {
        Self {
            toggles,
            entries: Vec::new(),
        }
    }

    /// Record a task execution event.
    pub fn task(&mut self, day: u64, summary: String, detail: String) {
        if !self.toggles.assignments {
            return;
        }
        self.push(day, None, "task", summary, detail);
    }

    /// Record an injury event.
    pub fn injury(&mut self, day: u64, agent_id: AgentId, summary: String) {
        if !self.toggles.injuries {
            return;
        }
        self.push(day, Some(agent_id), "injury", summary, String::new());
    }

    /// Record a non-empty reflection.
    pub fn reflection(&mut self, day: u64, agent_id: AgentId, text: String) {
        if !self.toggles.reflections {
            return;
        }
        self.push(day, Some(agent_id), "reflection", text, String::new());
    }

    /// Drain the buffered entries.
    pub fn flush(&mut self) -> Vec<SimulationLogEntry> {
        core::mem::take(&mut self.entries)
    }

    fn push(
        &mut self,
        day: u64,
        agent_id: Option<AgentId>,
        kind: &str,
        summary: String,
        detail: String,
    ) {
        info!(day, kind, agent_id = ?agent_id, %summary, "simulation event");
        self.entries.push(SimulationLogEntry {
            day,
            agent_id,
            kind: String::from(kind),
            summary,
            detail,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_drains_entries() {
        let mut logger = DayLogger::new(LoggingConfig::default());
        logger.task(1, String::from("gather ran"), String::new());
        logger.injury(1, AgentId::new(2), String::from("sprained ankle"));

        let entries = logger.flush();
        assert_eq!(entries.len(), 2);
        assert!(logger.flush().is_empty());
    }

    #[test]
    fn toggles_suppress_kinds() {
        let mut logger = DayLogger::new(LoggingConfig {
            assignments: false,
            reflections: true,
            injuries: false,
        });
        logger.task(1, String::from("hidden"), String::new());
        logger.injury(1, AgentId::new(1), String::from("hidden"));
        logger.reflection(1, AgentId::new(1), String::from("visible"));

        let entries = logger.flush();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries.first().map(|e| e.kind.as_str()),
            Some("reflection")
        );
    }
}
