//! `ms-behavior`: agent behavior model trait and intent types.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`intent`]     | `Intent` enum (`Emit`, `EmitAt`, `SetActivated`)              |
//! | [`context`]    | `SimContext<'a>`: read-only tick snapshot shared by all agents |
//! | [`model`]      | `BehaviorModel` trait                                         |
//! | [`signalling`] | `SignallingBehavior`: emit at a fixed rate, sense a threshold |
//! | [`noop`]       | `NoopBehavior`: placeholder that never produces intents      |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! The tick loop in ms-sim works in two phases:
//!
//! 1. **Proposal phase** (optionally parallel): for every agent, call
//!    `BehaviorModel::behave`.  All reads go through `&SimContext`, which
//!    holds the field as committed at the end of the previous tick.
//!
//! 2. **Commit phase** (sequential): consume the collected `Vec<Intent>`s in
//!    ascending `AgentId` order, buffering emissions into the field and
//!    writing activation flags into the `AgentStore`.
//!
//! Behaviors therefore never observe each other's emissions within a tick.

pub mod context;
pub mod error;
pub mod intent;
pub mod model;
pub mod noop;
pub mod signalling;


pub use context::SimContext;
pub use error::{BehaviorError, BehaviorResult};
pub use intent::Intent;
pub use model::BehaviorModel;
pub use noop::NoopBehavior;
pub use signalling::SignallingBehavior;
