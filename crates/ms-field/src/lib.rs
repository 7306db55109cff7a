//! `ms-field`: the diffusible chemical field agents emit into and sense.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`grid`]      | `Grid` (cell geometry over the world bounds), `CellIndex` |
//! | [`field`]     | `SpatialField`, `FieldConfig`, `AdvanceReport`            |
//! | [`stencil`]   | Explicit diffusion kernel and `Stability` analysis        |
//! | [`error`]     | `FieldError`, `FieldResult<T>`                            |
//!
//! # Update order
//!
//! Every call to [`SpatialField::advance`] performs, in this order:
//!
//! 1. fold the pending emission buffer into the grid and clear it;
//! 2. apply first-order decay `c *= exp(-k * dt)`;
//! 3. diffuse with a 7-point explicit stencil and zero-flux boundaries,
//!    sub-stepping whenever a single step would be unstable.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `FieldConfig`.          |

pub mod error;
pub mod field;
pub mod grid;
pub mod stencil;

#[cfg(test)]
mod tests;

pub use error::{FieldError, FieldResult};
pub use field::{AdvanceReport, FieldConfig, SpatialField};
pub use grid::{CellIndex, Grid};
pub use stencil::{MAX_SUBSTEPS, Stability};
