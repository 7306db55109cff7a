//! Regular Cartesian grid laid over the world bounds.
//!
//! # Data layout
//!
//! Cells are stored in a flat `Vec<f64>` in row-major order with x varying
//! fastest:
//!
//! ```text
//! linear(x, y, z) = x + nx * (y + ny * z)
//! ```
//!
//! so the face neighbours of a cell sit at offsets `±1`, `±nx` and `±nx*ny`.

use std::fmt;

use ms_core::{Axis, Bounds, Vec3};

use crate::{FieldError, FieldResult};

// ── CellIndex ─────────────────────────────────────────────────────────────────

/// Integer coordinates of one grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct CellIndex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl CellIndex {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Cell geometry: bounds, resolution, and the derived cell size.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    bounds: Bounds,
    dims:   [usize; 3],
    cell:   Vec3,
}

impl Grid {
    /// Build a grid of `dims` cells spanning `bounds`.  Every axis needs at
    /// least one cell.
    pub fn new(bounds: Bounds, dims: [usize; 3]) -> FieldResult<Self> {
        if dims.iter().any(|&n| n == 0) {
            return Err(FieldError::Config(format!(
                "grid resolution must be >= 1 on every axis, got {dims:?}"
            )));
        }
        if dims.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n)).is_none() {
            return Err(FieldError::Config(format!("grid resolution {dims:?} overflows")));
        }
        let extent = bounds.extent();
        let cell = Vec3::new(
            extent.x / dims[0] as f64,
            extent.y / dims[1] as f64,
            extent.z / dims[2] as f64,
        );
        Ok(Self { bounds, dims, cell })
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Physical side lengths `(Δx, Δy, Δz)` of one cell.
    #[inline]
    pub fn cell_size(&self) -> Vec3 {
        self.cell
    }

    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.cell.x * self.cell.y * self.cell.z
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell containing `p`, or `None` if `p` is outside the closed bounds.
    ///
    /// A point exactly on the max face belongs to the last cell of that axis.
    pub fn cell_of(&self, p: Vec3) -> Option<CellIndex> {
        if !self.bounds.contains(p) {
            return None;
        }
        let along = |axis: Axis, n: usize| {
            let offset = p.get(axis) - self.bounds.min.get(axis);
            let i = (offset / self.cell.get(axis)).floor() as usize;
            i.min(n - 1)
        };
        Some(CellIndex::new(
            along(Axis::X, self.dims[0]),
            along(Axis::Y, self.dims[1]),
            along(Axis::Z, self.dims[2]),
        ))
    }

    /// Flat storage offset of `c`, or `None` if it is outside the grid.
    #[inline]
    pub fn linear(&self, c: CellIndex) -> Option<usize> {
        let [nx, ny, nz] = self.dims;
        (c.x < nx && c.y < ny && c.z < nz).then(|| c.x + nx * (c.y + ny * c.z))
    }

    /// Inverse of [`linear`](Self::linear).  `i` must be `< len()`.
    #[inline]
    pub fn unlinear(&self, i: usize) -> CellIndex {
        let [nx, ny, _] = self.dims;
        CellIndex::new(i % nx, (i / nx) % ny, i / (nx * ny))
    }

    /// Geometric centre of cell `c`.
    pub fn cell_center(&self, c: CellIndex) -> Vec3 {
        let min = self.bounds.min;
        Vec3::new(
            min.x + (c.x as f64 + 0.5) * self.cell.x,
            min.y + (c.y as f64 + 0.5) * self.cell.y,
            min.z + (c.z as f64 + 0.5) * self.cell.z,
        )
    }

    /// Every cell index in storage order (x fastest).
    pub fn indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.len()).map(|i| self.unlinear(i))
    }
}
