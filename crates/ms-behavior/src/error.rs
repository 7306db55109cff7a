use thiserror::Error;

use ms_core::AgentId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    /// A behavior could not decide for this agent.  Aborts the tick.
    #[error("behavior failed for {agent}: {reason}")]
    Failed { agent: AgentId, reason: String },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
