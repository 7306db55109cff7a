//! The `BehaviorModel` trait: the main extension point for user code.

use ms_core::{AgentId, AgentRng};

use crate::{BehaviorResult, Intent, SimContext};

/// Pluggable agent behavior.
///
/// Called once per agent per tick, before the agent moves.  Receives a
/// read-only [`SimContext`] and the agent's own [`AgentRng`], so results are
/// deterministic regardless of thread ordering.
///
/// # Thread safety
///
/// The simulation loop may call `behave` for many agents in parallel via
/// Rayon, so implementations must be `Send + Sync`.  State that varies per
/// agent lives in `AgentStore` (read through `ctx.agents`), not in the model.
///
/// # Example
///
/// ```rust,ignore
/// struct Pulse { period: u64 }
///
/// impl BehaviorModel for Pulse {
///     fn behave(&self, _agent: AgentId, ctx: &SimContext, _rng: &mut AgentRng)
///         -> BehaviorResult<Vec<Intent>>
///     {
///         let on = ctx.tick.0 % self.period == 0;
///         Ok(if on { vec![Intent::Emit { amount: 1.0 }] } else { vec![] })
///     }
/// }
/// ```
pub trait BehaviorModel: Send + Sync + 'static {
    /// Decide what `agent` does this tick.
    ///
    /// An empty `Vec` leaves the agent's flags and the field untouched.
    /// Returning an error aborts the whole tick without committing anything.
    fn behave(
        &self,
        agent: AgentId,
        ctx:   &SimContext<'_>,
        rng:   &mut AgentRng,
    ) -> BehaviorResult<Vec<Intent>>;
}
