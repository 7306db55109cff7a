//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The behavior phase needs `&mut AgentRngs` (exclusive access to each
//! agent's RNG) and `&AgentStore` (shared read access to every agent's state)
//! at the same time.  Keeping the RNGs in their own struct lets both borrows
//! coexist:
//!
//! ```ignore
//! // ms-sim tick loop (simplified):
//! let store: &AgentStore = &sim.store;
//! let proposals = sim.rngs.inner
//!     .par_iter_mut()
//!     .enumerate()
//!     .map(|(i, rng)| behavior.behave(AgentId(i as u32), &ctx, rng))
//!     .collect::<Vec<_>>();
//! ```

use ms_core::{AgentId, AgentRng, Vec3};

use crate::{Capabilities, Emitter, Sensor};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`].
///
/// `AgentRngs` is `Send` but intentionally not shared: Rayon's
/// `par_iter_mut()` hands each worker exclusive access to distinct elements.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let p = store.position[agent.index()];
/// ```
///
/// Fields are `pub` for direct indexed reads.  During a run only the
/// scheduler's commit step writes them.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Kinematics ────────────────────────────────────────────────────────
    /// Centre of the agent.  Always inside the world bounds.
    pub position: Vec<Vec3>,

    /// Body radius.  Carried for renderers; the simulation treats agents as
    /// points.
    pub radius: Vec<f64>,

    /// Random-walk speed in length units per second.  0 = stationary.
    pub speed: Vec<f64>,

    // ── Signalling state ──────────────────────────────────────────────────
    /// Result of the most recent threshold test.
    pub activated: Vec<bool>,

    pub sensor: Vec<Option<Sensor>>,

    pub emitter: Vec<Option<Emitter>>,
}

impl AgentStore {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    pub fn capabilities(&self, agent: AgentId) -> Capabilities {
        let i = agent.index();
        Capabilities {
            senses: self.sensor[i].is_some(),
            emits:  self.emitter[i].is_some(),
            moves:  self.speed[i] > 0.0,
        }
    }

    /// Number of agents currently activated.
    pub fn activated_count(&self) -> usize {
        self.activated.iter().filter(|&&a| a).count()
    }

    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            count:     0,
            position:  Vec::with_capacity(count),
            radius:    Vec::with_capacity(count),
            speed:     Vec::with_capacity(count),
            activated: Vec::with_capacity(count),
            sensor:    Vec::with_capacity(count),
            emitter:   Vec::with_capacity(count),
        }
    }
}
