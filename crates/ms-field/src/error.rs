//! Field-subsystem error type.

use thiserror::Error;

use ms_core::{CoreError, Vec3};

use crate::CellIndex;

/// Errors produced by `ms-field`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("invalid field configuration: {0}")]
    Config(String),

    #[error("invalid quantity {0}: must be finite and >= 0")]
    InvalidQuantity(f64),

    /// Recoverable: the scheduler downgrades this to a warning and drops the
    /// emission.
    #[error("position {0} lies outside the field bounds")]
    OutOfBounds(Vec3),

    #[error("invalid time step {0}: must be finite and > 0")]
    InvalidDt(f64),

    #[error(
        "diffusion stability number {stability_number} needs more than {limit} sub-steps; \
         reduce dt or diffusivity, or coarsen the grid"
    )]
    TooManySubsteps { stability_number: f64, limit: u32 },

    #[error("cell {cell} is outside a {}x{}x{} grid", .dims[0], .dims[1], .dims[2])]
    CellOutOfRange { cell: CellIndex, dims: [usize; 3] },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type FieldResult<T> = Result<T, FieldError>;
