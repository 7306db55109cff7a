//! `ms-core`: foundational types for the `rust_microsim` framework.
//!
//! This crate is a dependency of every other `ms-*` crate.  It intentionally
//! has no `ms-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geom`]        | `Vec3`, `Bounds` (the simulation box)                 |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`world`]       | `World`: bounds plus clock, shared by every crate    |
//! | [`rng`]         | `AgentRng` (per-agent, seed-mixed)                    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on public value types (scenarios) |

pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;
pub mod world;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geom::{Axis, Bounds, Vec3};
pub use ids::AgentId;
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
pub use world::World;
