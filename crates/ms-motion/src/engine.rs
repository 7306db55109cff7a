//! Motion engine: proposes moves during a tick, commits them afterwards.

use ms_core::{AgentId, AgentRng, Bounds, Vec3};

use crate::{BoundaryPolicy, MotionError, MotionModel, MotionResult, MotionState};

/// A move computed but not yet applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    /// Target position, already inside the world box.
    pub position: Vec3,
    /// Motion state to store if the tick commits.
    pub state:    MotionState,
}

/// Wraps a [`MotionModel`] and the per-agent [`MotionState`]s.
///
/// # Type parameter
///
/// `M` is the motion model.  Use [`MotionKind`](crate::MotionKind) to pick
/// one at runtime, or a concrete model type for static dispatch.
pub struct MotionEngine<M: MotionModel> {
    pub model:  M,
    pub policy: BoundaryPolicy,
    states:     Vec<MotionState>,
}

impl<M: MotionModel> MotionEngine<M> {
    pub fn new(model: M, policy: BoundaryPolicy, agent_count: usize) -> Self {
        Self { model, policy, states: vec![MotionState::default(); agent_count] }
    }

    /// Compute where `agent` goes this tick without changing anything.
    ///
    /// Agents with `speed == 0` stay put and draw nothing from `rng`.
    pub fn propose(
        &self,
        agent:    AgentId,
        position: Vec3,
        speed:    f64,
        dt:       f64,
        bounds:   &Bounds,
        rng:      &mut AgentRng,
    ) -> MotionResult<Proposal> {
        let mut state = self.states[agent.index()];
        if speed == 0.0 {
            return Ok(Proposal { position, state });
        }

        let raw = position + self.model.displacement(&mut state, speed, dt, rng);
        if !raw.is_finite() {
            return Err(MotionError::NonFinite { agent, position: raw });
        }
        let position = self.policy.apply(raw, &mut state.direction, bounds);
        Ok(Proposal { position, state })
    }

    /// Store the motion state of an accepted proposal.
    #[inline]
    pub fn commit(&mut self, agent: AgentId, state: MotionState) {
        self.states[agent.index()] = state;
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> &MotionState {
        &self.states[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
