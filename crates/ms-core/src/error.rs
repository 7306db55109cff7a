//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` or wrap it as one variant, whichever keeps error sites clean.

use thiserror::Error;

use crate::Axis;

/// Configuration errors detected while constructing core types.
///
/// All of these are raised at construction time; nothing in `ms-core` fails
/// once a `World` exists.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("time step must be finite and > 0, got {0}")]
    InvalidDt(f64),

    #[error("degenerate bounds on {axis} axis: min {min} must be < max {max}")]
    DegenerateBounds { axis: Axis, min: f64, max: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ms-core`.
pub type CoreResult<T> = Result<T, CoreError>;
