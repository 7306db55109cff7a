//! Explicit finite-difference diffusion on a [`Grid`].
//!
//! # Scheme
//!
//! Forward-Euler in time, 7-point stencil in space.  With per-axis numbers
//! `α_a = D·dt / Δa²` the update of cell `i` is
//!
//! ```text
//! c'[i] = (1 - Σ α_nb) · c[i] + Σ α_nb · c[nb]
//! ```
//!
//! where the sums run over the face neighbours that exist.  A missing
//! neighbour (domain face) simply contributes no flux, which is the
//! zero-flux (Neumann) boundary and makes the scheme exactly conservative:
//! every exchange between two cells is antisymmetric.
//!
//! # Stability
//!
//! All weights are non-negative, hence the update is a convex combination and
//! preserves non-negativity, iff
//!
//! ```text
//! s = D·dt·(1/Δx² + 1/Δy² + 1/Δz²) <= 1/2
//! ```
//!
//! (for cubic cells: `D·dt/Δ² <= 1/6`).  Axes with a single cell have no
//! neighbours and do not count towards `s`.  Larger steps are split into
//! `ceil(s / 0.5)` sub-steps, up to [`MAX_SUBSTEPS`]; beyond that the step is
//! rejected with [`FieldError::TooManySubsteps`].

use ms_core::Axis;

use crate::{FieldError, FieldResult, Grid};

/// Largest stability number a single explicit step tolerates.
pub const STABILITY_LIMIT: f64 = 0.5;

/// Most diffusion sub-steps one `advance` may take.
pub const MAX_SUBSTEPS: u32 = 10_000;

/// Outcome of a stability check for one `advance(dt)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stability {
    /// `D·dt·Σ 1/Δa²` over axes with more than one cell.
    pub number:   f64,
    /// Diffusion sub-steps needed to keep every sub-step within the limit.
    pub substeps: u32,
    /// `true` if one full step is already stable.
    pub stable:   bool,
}

impl Stability {
    /// `Ok(self)` if the sub-step count is within [`MAX_SUBSTEPS`].
    pub fn within_limit(self) -> FieldResult<Self> {
        if self.substeps > MAX_SUBSTEPS {
            return Err(FieldError::TooManySubsteps {
                stability_number: self.number,
                limit:            MAX_SUBSTEPS,
            });
        }
        Ok(self)
    }
}

/// Per-axis diffusion numbers `α_a = D·dt / Δa²`, zero on single-cell axes.
pub fn axis_numbers(grid: &Grid, diffusivity: f64, dt: f64) -> [f64; 3] {
    let dims = grid.dims();
    let cell = grid.cell_size();
    let mut alpha = [0.0; 3];
    for (k, axis) in Axis::ALL.into_iter().enumerate() {
        if dims[k] > 1 {
            let h = cell.get(axis);
            alpha[k] = diffusivity * dt / (h * h);
        }
    }
    alpha
}

/// Stability analysis for a step of `dt`.  `substeps` saturates at
/// `u32::MAX`; see [`Stability::within_limit`].
pub fn stability(grid: &Grid, diffusivity: f64, dt: f64) -> Stability {
    let number: f64 = axis_numbers(grid, diffusivity, dt).iter().sum();
    let stable = number <= STABILITY_LIMIT;
    let substeps = if stable {
        1
    } else {
        let n = (number / STABILITY_LIMIT).ceil();
        if n >= u32::MAX as f64 { u32::MAX } else { n as u32 }
    };
    Stability { number, substeps, stable }
}

/// One explicit diffusion step from `src` into `dst` with per-axis numbers
/// `alpha`.  Both slices must have `grid.len()` elements.
pub fn diffuse_step(grid: &Grid, alpha: [f64; 3], src: &[f64], dst: &mut [f64]) {
    let [nx, ny, nz] = grid.dims();
    let stride = [1, nx, nx * ny];

    for z in 0..nz {
        for y in 0..ny {
            let row = nx * (y + ny * z);
            for x in 0..nx {
                let i = row + x;
                let pos = [x, y, z];
                let dims = [nx, ny, nz];

                let mut self_weight = 1.0;
                let mut inflow = 0.0;
                for k in 0..3 {
                    let a = alpha[k];
                    if a == 0.0 {
                        continue;
                    }
                    if pos[k] > 0 {
                        self_weight -= a;
                        inflow += a * src[i - stride[k]];
                    }
                    if pos[k] + 1 < dims[k] {
                        self_weight -= a;
                        inflow += a * src[i + stride[k]];
                    }
                }
                dst[i] = self_weight * src[i] + inflow;
            }
        }
    }
}
