//! `SpatialField`: the chemical concentration grid.
//!
//! Concentration is quantity per unit volume.  Emitters deposit *quantities*
//! through [`SpatialField::add_quantity`]; those land in a pending buffer and
//! only become visible as concentration at the next
//! [`advance`](SpatialField::advance), so every reader within a tick sees the
//! same, last-committed field.

use tracing::debug;

use ms_core::{Bounds, Vec3, time::check_dt};

use crate::stencil::{self, Stability};
use crate::{CellIndex, FieldError, FieldResult, Grid};

// ── FieldConfig ───────────────────────────────────────────────────────────────

/// Construction parameters for a [`SpatialField`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldConfig {
    /// Number of cells along x, y, z.
    pub resolution:  [usize; 3],
    /// Diffusion coefficient in length²/second.  0 disables diffusion.
    pub diffusivity: f64,
    /// First-order decay constant in 1/second.  0 disables decay.
    pub decay_rate:  f64,
}

impl FieldConfig {
    pub fn new(resolution: [usize; 3], diffusivity: f64, decay_rate: f64) -> Self {
        Self { resolution, diffusivity, decay_rate }
    }

    fn validate(&self) -> FieldResult<()> {
        if !self.diffusivity.is_finite() || self.diffusivity < 0.0 {
            return Err(FieldError::Config(format!(
                "diffusivity must be finite and >= 0, got {}",
                self.diffusivity
            )));
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(FieldError::Config(format!(
                "decay rate must be finite and >= 0, got {}",
                self.decay_rate
            )));
        }
        Ok(())
    }
}

// ── AdvanceReport ─────────────────────────────────────────────────────────────

/// What one [`SpatialField::advance`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AdvanceReport {
    /// Stability number of the full step (before sub-stepping).
    pub stability_number: f64,
    /// Diffusion sub-steps actually taken (0 when diffusivity is 0).
    pub substeps:         u32,
    /// Quantity folded in from the emission buffer.
    pub emitted_quantity: f64,
}

// ── SpatialField ──────────────────────────────────────────────────────────────

/// Discretized scalar field over the world bounds.
///
/// Values are non-negative after every operation.  The grid is mutated only
/// by [`advance`](Self::advance) and [`set_concentration`](Self::set_concentration);
/// emissions are buffered until the next advance.
#[derive(Clone, Debug)]
pub struct SpatialField {
    grid:        Grid,
    diffusivity: f64,
    decay_rate:  f64,

    /// Concentration per cell, indexed by `Grid::linear`.
    conc:    Vec<f64>,
    /// Quantities emitted since the last advance.
    pending: Vec<f64>,
    /// Double buffer for the diffusion kernel.
    scratch: Vec<f64>,
}

impl SpatialField {
    /// An all-zero field covering `bounds`.
    pub fn new(bounds: Bounds, config: FieldConfig) -> FieldResult<Self> {
        config.validate()?;
        let grid = Grid::new(bounds, config.resolution)?;
        let n = grid.len();
        Ok(Self {
            grid,
            diffusivity: config.diffusivity,
            decay_rate:  config.decay_rate,
            conc:    vec![0.0; n],
            pending: vec![0.0; n],
            scratch: vec![0.0; n],
        })
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Queue `amount` of chemical for deposit into the cell containing
    /// `position`.  Takes effect at the next [`advance`](Self::advance).
    pub fn add_quantity(&mut self, position: Vec3, amount: f64) -> FieldResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(FieldError::InvalidQuantity(amount));
        }
        let i = self
            .grid
            .cell_of(position)
            .and_then(|c| self.grid.linear(c))
            .ok_or(FieldError::OutOfBounds(position))?;
        self.pending[i] += amount;
        Ok(())
    }

    /// Overwrite the concentration of one cell.  Intended for initial
    /// conditions; bypasses the emission buffer.
    pub fn set_concentration(&mut self, cell: CellIndex, value: f64) -> FieldResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(FieldError::InvalidQuantity(value));
        }
        let i = self.linear_checked(cell)?;
        self.conc[i] = value;
        Ok(())
    }

    /// Advance the field by `dt` seconds: fold in emissions, decay, diffuse.
    ///
    /// Fails without touching the grid if `dt` is invalid or diffusion would
    /// need more than [`MAX_SUBSTEPS`](stencil::MAX_SUBSTEPS) sub-steps.
    pub fn advance(&mut self, dt: f64) -> FieldResult<AdvanceReport> {
        let stability = self.check_stability(dt)?;

        // 1. emissions
        let volume = self.grid.cell_volume();
        let mut emitted = 0.0;
        for (c, q) in self.conc.iter_mut().zip(self.pending.iter_mut()) {
            if *q != 0.0 {
                emitted += *q;
                *c += *q / volume;
                *q = 0.0;
            }
        }

        // 2. decay
        if self.decay_rate > 0.0 {
            let factor = (-self.decay_rate * dt).exp();
            self.conc.iter_mut().for_each(|c| *c *= factor);
        }

        // 3. diffusion
        let mut substeps = 0;
        if self.diffusivity > 0.0 && stability.number > 0.0 {
            substeps = stability.substeps;
            if substeps > 1 {
                debug!(
                    stability_number = stability.number,
                    substeps, "sub-stepping diffusion"
                );
            }
            let alpha = stencil::axis_numbers(&self.grid, self.diffusivity, dt / substeps as f64);
            for _ in 0..substeps {
                stencil::diffuse_step(&self.grid, alpha, &self.conc, &mut self.scratch);
                std::mem::swap(&mut self.conc, &mut self.scratch);
            }
        }

        Ok(AdvanceReport {
            stability_number: stability.number,
            substeps,
            emitted_quantity: emitted,
        })
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Concentration at `position` (nearest-cell lookup).  0 outside bounds.
    pub fn concentration(&self, position: Vec3) -> f64 {
        self.grid
            .cell_of(position)
            .and_then(|c| self.grid.linear(c))
            .map_or(0.0, |i| self.conc[i])
    }

    /// Stability of a step of `dt` under this field's diffusivity.
    pub fn stability(&self, dt: f64) -> Stability {
        stencil::stability(&self.grid, self.diffusivity, dt)
    }

    /// [`stability`](Self::stability) for a valid `dt`, rejecting steps
    /// that need more than [`MAX_SUBSTEPS`](stencil::MAX_SUBSTEPS) sub-steps.
    pub fn check_stability(&self, dt: f64) -> FieldResult<Stability> {
        check_dt(dt).map_err(|_| FieldError::InvalidDt(dt))?;
        self.stability(dt).within_limit()
    }

    /// Concentration of one cell.
    pub fn value(&self, cell: CellIndex) -> FieldResult<f64> {
        Ok(self.conc[self.linear_checked(cell)?])
    }

    /// Concentrations in storage order (x fastest).
    #[inline]
    pub fn cells(&self) -> &[f64] {
        &self.conc
    }

    /// Cell containing `position`, if inside bounds.
    #[inline]
    pub fn cell_index(&self, position: Vec3) -> Option<CellIndex> {
        self.grid.cell_of(position)
    }

    #[inline]
    pub fn cell_center(&self, cell: CellIndex) -> Vec3 {
        self.grid.cell_center(cell)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.grid.dims()
    }

    #[inline]
    pub fn cell_size(&self) -> Vec3 {
        self.grid.cell_size()
    }

    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.grid.cell_volume()
    }

    #[inline]
    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    #[inline]
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Total committed quantity (Σ concentration × cell volume).
    pub fn total_quantity(&self) -> f64 {
        self.conc.iter().sum::<f64>() * self.grid.cell_volume()
    }

    /// Quantity waiting in the emission buffer.
    pub fn pending_quantity(&self) -> f64 {
        self.pending.iter().sum()
    }

    /// Highest cell concentration.
    pub fn peak_concentration(&self) -> f64 {
        self.conc.iter().copied().fold(0.0, f64::max)
    }

    fn linear_checked(&self, cell: CellIndex) -> FieldResult<usize> {
        self.grid
            .linear(cell)
            .ok_or(FieldError::CellOutOfRange { cell, dims: self.grid.dims() })
    }
}
