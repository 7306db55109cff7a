//! `ms-sim`: tick scheduler for the rust_microsim framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Propose: for every agent in ascending AgentId order:
//!                 BehaviorModel::behave  → intents
//!                 MotionEngine::propose  → target position
//!               (parallel with the `parallel` feature; nothing is written)
//!   ② Commit : emissions into the field buffer, activation flags,
//!               positions, motion state; ascending AgentId order
//!   ③ Field  : SpatialField::advance(dt), exactly once
//!   ④ Clock  : World elapsed time += dt
//! ```
//!
//! If any agent fails in ①, the tick is abandoned before ② and the previous
//! state stays intact (see [`SimError::TickFailure`]).
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the proposal phase on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ms_agent::{AgentSpec, AgentStoreBuilder};
//! use ms_behavior::SignallingBehavior;
//! use ms_core::{Bounds, SimConfig, Vec3};
//! use ms_field::FieldConfig;
//! use ms_motion::RandomWalk;
//! use ms_sim::{NoopObserver, SimBuilder};
//!
//! let bounds = Bounds::from_size(100.0, 100.0, 100.0)?;
//! let config = SimConfig::for_duration(0.01, 20.0, 42)?;
//! let (store, rngs) = AgentStoreBuilder::new(config.seed)
//!     .agent(AgentSpec::new(Vec3::splat(50.0)).emitter(8.0e9))
//!     .build()?;
//! let mut sim = SimBuilder::new(config, bounds, store, rngs, SignallingBehavior, RandomWalk)
//!     .field_config(FieldConfig::new([20, 20, 20], 890.0, 0.9))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod scenario;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult, TickFailureCause};
pub use observer::{NoopObserver, SimObserver};
pub use report::{SimWarning, TickReport};
pub use scenario::Scenario;
pub use sim::{RunState, Sim};
