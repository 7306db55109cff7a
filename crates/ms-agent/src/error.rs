use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Rejected at construction; `index` is the agent's position in the
    /// builder (and therefore its future `AgentId`).
    #[error("agent #{index}: {reason}")]
    InvalidSpec { index: usize, reason: String },

    #[error("population parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;
