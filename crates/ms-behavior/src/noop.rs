//! A no-op behavior model: agents never produce intents.

use ms_core::{AgentId, AgentRng};

use crate::{BehaviorModel, BehaviorResult, Intent, SimContext};

/// A [`BehaviorModel`] that always returns an empty intent list.
///
/// Useful in tests, or for populations that only wander.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn behave(
        &self,
        _agent: AgentId,
        _ctx:   &SimContext<'_>,
        _rng:   &mut AgentRng,
    ) -> BehaviorResult<Vec<Intent>> {
        Ok(vec![])
    }
}
