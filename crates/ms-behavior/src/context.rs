//! Read-only simulation state passed to every behavior callback.

use ms_agent::AgentStore;
use ms_core::{AgentId, Tick};
use ms_field::SpatialField;

/// A read-only snapshot of the simulation state passed to every
/// [`BehaviorModel`][crate::BehaviorModel] callback.
///
/// `SimContext` is built once per tick by ms-sim and shared immutably across
/// all agent callbacks.  The field is the state committed at the end of the
/// previous tick; emissions made this tick are not yet visible.
pub struct SimContext<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// Seconds per tick.
    pub dt: f64,

    /// Simulated seconds elapsed before this tick.
    pub elapsed_secs: f64,

    /// Read-only view of every agent's SoA state arrays.
    pub agents: &'a AgentStore,

    /// The chemical field.
    pub field: &'a SpatialField,
}

impl<'a> SimContext<'a> {
    #[inline]
    pub fn new(
        tick:         Tick,
        dt:           f64,
        elapsed_secs: f64,
        agents:       &'a AgentStore,
        field:        &'a SpatialField,
    ) -> Self {
        Self { tick, dt, elapsed_secs, agents, field }
    }

    /// Concentration at `agent`'s current position.
    #[inline]
    pub fn concentration_at(&self, agent: AgentId) -> f64 {
        self.field.concentration(self.agents.position[agent.index()])
    }
}
