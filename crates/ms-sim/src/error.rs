use std::fmt;

use thiserror::Error;

use ms_agent::AgentError;
use ms_behavior::BehaviorError;
use ms_core::{AgentId, CoreError, Tick};
use ms_field::FieldError;
use ms_motion::MotionError;

/// Why a tick was abandoned.
#[derive(Debug, Clone, PartialEq)]
pub enum TickFailureCause {
    Behavior(BehaviorError),
    Motion(MotionError),
    /// A behavior asked to emit a negative or non-finite amount.
    InvalidEmission(FieldError),
    /// The field update itself failed.
    Field(FieldError),
}

impl fmt::Display for TickFailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickFailureCause::Behavior(e)        => write!(f, "behavior: {e}"),
            TickFailureCause::Motion(e)          => write!(f, "motion: {e}"),
            TickFailureCause::InvalidEmission(e) => write!(f, "emission: {e}"),
            TickFailureCause::Field(e)           => write!(f, "field: {e}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    /// The tick was abandoned without committing anything.  The simulation
    /// remains `Running`; the caller may retry, stop, or drop it.
    #[error("tick {tick} failed{}: {cause}", .agent.map(|a| format!(" for {a}")).unwrap_or_default())]
    TickFailure {
        tick:  Tick,
        agent: Option<AgentId>,
        cause: TickFailureCause,
    },

    #[error("simulation is stopped")]
    Stopped,

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
