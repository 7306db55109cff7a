//! Agent intents: the state changes an agent can request during a tick.

use ms_core::Vec3;

/// A change that an agent wants applied at the end of the current tick.
///
/// Intents are produced by [`BehaviorModel::behave`][crate::BehaviorModel::behave]
/// and committed by the scheduler (ms-sim) in ascending `AgentId` order.
/// Several intents may be returned per agent; a later `SetActivated` from
/// the same agent overrides an earlier one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Deposit `amount` of chemical at the agent's position (before this
    /// tick's move).
    Emit { amount: f64 },

    /// Deposit `amount` of chemical at an explicit `position`.
    ///
    /// A position outside the world is dropped with a warning.
    EmitAt { position: Vec3, amount: f64 },

    /// Set the agent's activation flag.
    SetActivated(bool),
}

impl Intent {
    /// Quantity this intent deposits into the field, if any.
    #[inline]
    pub fn emitted_amount(&self) -> Option<f64> {
        match *self {
            Intent::Emit { amount } | Intent::EmitAt { amount, .. } => Some(amount),
            Intent::SetActivated(_) => None,
        }
    }
}
