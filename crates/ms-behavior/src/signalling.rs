//! Emit-and-sense behavior driven entirely by agent capabilities.

use ms_core::{AgentId, AgentRng};

use crate::{BehaviorModel, BehaviorResult, Intent, SimContext};

/// The built-in signalling behavior.
///
/// Per agent and tick:
///
/// - with an `Emitter`: emit `production_rate * dt` at its position;
/// - with a `Sensor`: become activated iff the concentration at its position
///   is strictly above `threshold`, deactivated otherwise.
///
/// Agents with neither capability produce no intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignallingBehavior;

impl BehaviorModel for SignallingBehavior {
    fn behave(
        &self,
        agent: AgentId,
        ctx:   &SimContext<'_>,
        _rng:  &mut AgentRng,
    ) -> BehaviorResult<Vec<Intent>> {
        let i = agent.index();
        let mut intents = Vec::new();

        if let Some(emitter) = ctx.agents.emitter[i] {
            intents.push(Intent::Emit { amount: emitter.production_rate * ctx.dt });
        }
        if let Some(sensor) = ctx.agents.sensor[i] {
            let c = ctx.concentration_at(agent);
            intents.push(Intent::SetActivated(c > sensor.threshold));
        }
        Ok(intents)
    }
}
