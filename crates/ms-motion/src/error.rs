use ms_core::{AgentId, Vec3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    #[error("motion produced a non-finite position {position} for {agent}")]
    NonFinite { agent: AgentId, position: Vec3 },

    #[error("motion configuration error: {0}")]
    Config(String),
}

pub type MotionResult<T> = Result<T, MotionError>;
