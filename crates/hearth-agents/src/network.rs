//! Weighted directed social network with decay and reinforcement.
//!
//! Edges are keyed by `(source, target)` — at most one edge per ordered
//! pair. Each simulated day the orchestrator applies one decay pass
//! (multiplying every weight by `1 - forget_factor` and pruning edges
//! that fall below the floor) and reinforces the edges of agents who
//! worked together.
//!
//! Statistics:
//! - **reciprocity** — fraction of edges whose reverse edge also exists.
//! - **assortativity** — fraction of camp-known edges staying within one
//!   camp (0.5 when no endpoint camps are known).
//! - **clustering** — closed over open triads, where a triad rooted at
//!   `v` is an ordered pair `(a, b)` of distinct out-neighbors of `v`,
//!   closed when the edge `a -> b` exists.

use std::collections::{BTreeMap, BTreeSet};

use hearth_types::ids::AgentId;
use hearth_types::outputs::NetworkStats;
use hearth_types::state::{NetworkEdge, NetworkState};
use tracing::trace;

/// Edges lighter than this are deleted during decay.
const WEIGHT_FLOOR: f64 = 0.01;

/// Assortativity reported when no edge has both endpoint camps known.
const ASSORTATIVITY_DEFAULT: f64 = 0.5;

/// The band's social network.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialNetwork {
    edges: BTreeMap<(AgentId, AgentId), f64>,
    forget_factor: f64,
    camp_membership: BTreeMap<AgentId, String>,
}

impl SocialNetwork {
    /// Create an empty network.
    pub const fn new(forget_factor: f64, camp_membership: BTreeMap<AgentId, String>) -> Self {
        Self {
            edges: BTreeMap::new(),
            forget_factor,
            camp_membership,
        }
    }

    /// Rebuild a network from its serialized state.
    pub fn from_state(state: &NetworkState) -> Self {
        let edges = state
            .edges
            .iter()
            .map(|edge| ((edge.source, edge.target), edge.weight))
            .collect();
        Self {
            edges,
            forget_factor: state.forget_factor,
            camp_membership: state.camp_membership.clone(),
        }
    }

    /// Serialize the network; edges come out sorted by `(source, target)`.
    pub fn to_state(&self) -> NetworkState {
        NetworkState {
            edges: self
                .edges
                .iter()
                .map(|(&(source, target), &weight)| NetworkEdge {
                    source,
                    target,
                    weight,
                })
                .collect(),
            forget_factor: self.forget_factor,
            camp_membership: self.camp_membership.clone(),
        }
    }

    /// Current weight of the `source -> target` edge, if present.
    pub fn weight(&self, source: AgentId, target: AgentId) -> Option<f64> {
        self.edges.get(&(source, target)).copied()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Multiply every weight by `1 - forget_factor` and prune edges that
    /// fall below the floor.
    pub fn apply_decay(&mut self) {
        let keep = 1.0 - self.forget_factor;
        for weight in self.edges.values_mut() {
            *weight *= keep;
        }
        let before = self.edges.len();
        self.edges.retain(|_, weight| *weight >= WEIGHT_FLOOR);
        let pruned = before - self.edges.len();
        if pruned > 0 {
            trace!(pruned, remaining = self.edges.len(), "edges pruned by decay");
        }
    }

    /// Add `delta` to the `source -> target` edge, creating it at zero
    /// if absent.
    pub fn reinforce_interaction(&mut self, source: AgentId, target: AgentId, delta: f64) {
        let weight = self.edges.entry((source, target)).or_insert(0.0);
        *weight += delta;
    }

    /// Compute reciprocity, assortativity, and clustering.
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            reciprocity: self.reciprocity(),
            assortativity: self.assortativity(),
            clustering: self.clustering(),
            edge_count: self.edges.len(),
        }
    }

    /// Fraction of edges whose reverse edge also exists.
    fn reciprocity(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        let mutual = self
            .edges
            .keys()
            .filter(|&&(source, target)| self.edges.contains_key(&(target, source)))
            .count();
        mutual as f64 / self.edges.len() as f64
    }

    /// Fraction of camp-known edges staying within one camp.
    fn assortativity(&self) -> f64 {
        let mut known = 0_usize;
        let mut same_camp = 0_usize;
        for &(source, target) in self.edges.keys() {
            let (Some(source_camp), Some(target_camp)) = (
                self.camp_membership.get(&source),
                self.camp_membership.get(&target),
            ) else {
                continue;
            };
            known += 1;
            if source_camp == target_camp {
                same_camp += 1;
            }
        }
        if known == 0 {
            return ASSORTATIVITY_DEFAULT;
        }
        same_camp as f64 / known as f64
    }

    /// Closed over open triads using out-neighbor sets.
    fn clustering(&self) -> f64 {
        let mut out_neighbors: BTreeMap<AgentId, BTreeSet<AgentId>> = BTreeMap::new();
        for &(source, target) in self.edges.keys() {
            out_neighbors.entry(source).or_default().insert(target);
        }

        let mut open = 0_usize;
        let mut closed = 0_usize;
        for neighbors in out_neighbors.values() {
            for &a in neighbors {
                for &b in neighbors {
                    if a == b {
                        continue;
                    }
                    open += 1;
                    if self.edges.contains_key(&(a, b)) {
                        closed += 1;
                    }
                }
            }
        }

        if open == 0 {
            return 0.0;
        }
        closed as f64 / open as f64
    }
}
