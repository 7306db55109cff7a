//! `ms-motion`: how agents move through the world box.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`state`]    | `MotionState`: per-agent persistent motion state               |
//! | [`model`]    | `MotionModel` trait, `Stationary`, `RandomWalk`, `RunAndTumble`, `MotionKind` |
//! | [`boundary`] | `BoundaryPolicy` (`Reflect`, `Clamp`)                           |
//! | [`engine`]   | `MotionEngine<M>`: propose / commit per agent                  |
//! | [`error`]    | `MotionError`, `MotionResult<T>`                                |
//!
//! # Movement model
//!
//! Each tick, for every agent with `speed > 0`:
//!
//! 1. the [`MotionModel`] draws a displacement from the agent's own RNG;
//! 2. the [`BoundaryPolicy`] maps the raw target back into the world box;
//! 3. the result is returned as a [`Proposal`] and only written back by
//!    [`MotionEngine::commit`] once the whole tick has succeeded.
//!
//! Agents never interact: there is no collision handling.

pub mod boundary;
pub mod engine;
pub mod error;
pub mod model;
pub mod state;

#[cfg(test)]
mod tests;

pub use boundary::BoundaryPolicy;
pub use engine::{MotionEngine, Proposal};
pub use error::{MotionError, MotionResult};
pub use model::{MotionKind, MotionModel, RandomWalk, RunAndTumble, Stationary};
pub use state::MotionState;
