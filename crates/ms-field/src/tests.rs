//! Unit tests for ms-field.

#[cfg(test)]
mod helpers {
    use ms_core::Bounds;

    use crate::{FieldConfig, SpatialField};

    /// Cubic box of side `n` with unit cells.
    pub fn unit_field(n: usize, diffusivity: f64, decay_rate: f64) -> SpatialField {
        let side = n as f64;
        let bounds = Bounds::from_size(side, side, side).unwrap();
        SpatialField::new(bounds, FieldConfig::new([n, n, n], diffusivity, decay_rate)).unwrap()
    }

    pub fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
    }
}

// ── Grid mapping ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_tests {
    use ms_core::{Bounds, Vec3};

    use crate::{CellIndex, FieldConfig, FieldError, Grid, SpatialField};

    fn grid() -> Grid {
        Grid::new(Bounds::from_size(100.0, 100.0, 100.0).unwrap(), [20, 20, 20]).unwrap()
    }

    #[test]
    fn cell_geometry() {
        let g = grid();
        assert_eq!(g.cell_size(), Vec3::splat(5.0));
        assert_eq!(g.cell_volume(), 125.0);
        assert_eq!(g.len(), 8000);
        assert_eq!(g.cell_center(CellIndex::new(0, 0, 0)), Vec3::splat(2.5));
    }

    #[test]
    fn nearest_cell_mapping() {
        let g = grid();
        assert_eq!(g.cell_of(Vec3::splat(50.0)), Some(CellIndex::new(10, 10, 10)));
        assert_eq!(g.cell_of(Vec3::new(4.999, 5.0, 0.0)), Some(CellIndex::new(0, 1, 0)));
    }

    #[test]
    fn max_face_maps_to_last_cell() {
        let g = grid();
        assert_eq!(g.cell_of(Vec3::splat(100.0)), Some(CellIndex::new(19, 19, 19)));
    }

    #[test]
    fn outside_maps_to_none() {
        let g = grid();
        assert_eq!(g.cell_of(Vec3::new(-0.1, 50.0, 50.0)), None);
        assert_eq!(g.cell_of(Vec3::new(50.0, f64::NAN, 50.0)), None);
    }

    #[test]
    fn linear_roundtrip_is_x_fastest() {
        let g = grid();
        assert_eq!(g.linear(CellIndex::new(1, 0, 0)), Some(1));
        assert_eq!(g.linear(CellIndex::new(0, 1, 0)), Some(20));
        assert_eq!(g.linear(CellIndex::new(0, 0, 1)), Some(400));
        assert_eq!(g.unlinear(421), CellIndex::new(1, 1, 1));
        assert_eq!(g.linear(CellIndex::new(20, 0, 0)), None);
    }

    #[test]
    fn zero_resolution_rejected() {
        let bounds = Bounds::from_size(1.0, 1.0, 1.0).unwrap();
        let err = SpatialField::new(bounds, FieldConfig::new([4, 0, 4], 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }

    #[test]
    fn bad_coefficients_rejected() {
        let bounds = Bounds::from_size(1.0, 1.0, 1.0).unwrap();
        assert!(SpatialField::new(bounds, FieldConfig::new([2, 2, 2], -1.0, 0.0)).is_err());
        assert!(SpatialField::new(bounds, FieldConfig::new([2, 2, 2], 1.0, f64::NAN)).is_err());
    }
}

// ── Emission buffer ───────────────────────────────────────────────────────────

#[cfg(test)]
mod emission_tests {
    use ms_core::Vec3;

    use super::helpers::{rel_close, unit_field};
    use crate::{CellIndex, FieldError};

    #[test]
    fn emission_invisible_until_advance() {
        let mut f = unit_field(5, 0.0, 0.0);
        f.add_quantity(Vec3::splat(2.5), 10.0).unwrap();
        assert_eq!(f.concentration(Vec3::splat(2.5)), 0.0);
        assert_eq!(f.pending_quantity(), 10.0);

        let report = f.advance(0.1).unwrap();
        assert_eq!(report.emitted_quantity, 10.0);
        assert_eq!(f.pending_quantity(), 0.0);
        assert_eq!(f.concentration(Vec3::splat(2.5)), 10.0);
    }

    #[test]
    fn buffer_does_not_carry_over() {
        let mut f = unit_field(3, 0.0, 0.0);
        f.add_quantity(Vec3::splat(1.5), 4.0).unwrap();
        f.advance(1.0).unwrap();
        f.advance(1.0).unwrap();
        assert_eq!(f.total_quantity(), 4.0);
    }

    #[test]
    fn concentration_divides_by_cell_volume() {
        let bounds = ms_core::Bounds::from_size(10.0, 10.0, 10.0).unwrap();
        let mut f =
            crate::SpatialField::new(bounds, crate::FieldConfig::new([5, 5, 5], 0.0, 0.0)).unwrap();
        f.add_quantity(Vec3::splat(5.0), 80.0).unwrap();
        f.advance(0.5).unwrap();
        assert_eq!(f.value(CellIndex::new(2, 2, 2)).unwrap(), 10.0);
        assert!(rel_close(f.total_quantity(), 80.0, 1e-12));
    }

    #[test]
    fn invalid_quantities_rejected() {
        let mut f = unit_field(3, 0.0, 0.0);
        let p = Vec3::splat(1.0);
        assert_eq!(f.add_quantity(p, -1.0), Err(FieldError::InvalidQuantity(-1.0)));
        assert!(matches!(f.add_quantity(p, f64::NAN), Err(FieldError::InvalidQuantity(_))));
        assert!(f.add_quantity(p, f64::INFINITY).is_err());
        assert_eq!(f.pending_quantity(), 0.0);
    }

    #[test]
    fn out_of_bounds_write_rejected_read_is_zero() {
        let mut f = unit_field(3, 0.0, 0.0);
        let outside = Vec3::new(3.5, 1.0, 1.0);
        assert_eq!(f.add_quantity(outside, 1.0), Err(FieldError::OutOfBounds(outside)));
        assert_eq!(f.concentration(outside), 0.0);
    }

    #[test]
    fn set_concentration_validates() {
        let mut f = unit_field(3, 0.0, 0.0);
        f.set_concentration(CellIndex::new(1, 1, 1), 2.0).unwrap();
        assert_eq!(f.peak_concentration(), 2.0);
        assert!(f.set_concentration(CellIndex::new(0, 0, 0), -1.0).is_err());
        assert!(matches!(
            f.set_concentration(CellIndex::new(3, 0, 0), 1.0),
            Err(FieldError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_dt_rejected() {
        let mut f = unit_field(3, 1.0, 0.0);
        assert_eq!(f.advance(0.0), Err(FieldError::InvalidDt(0.0)));
        assert!(f.advance(f64::NAN).is_err());
    }
}

// ── Decay ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decay_tests {
    use super::helpers::{rel_close, unit_field};
    use crate::CellIndex;

    #[test]
    fn decay_follows_exponential_law() {
        let (k, dt, c0) = (0.9, 0.01, 1000.0);
        let mut f = unit_field(3, 0.0, k);
        let cell = CellIndex::new(1, 1, 1);
        f.set_concentration(cell, c0).unwrap();
        for step in 1..=500 {
            f.advance(dt).unwrap();
            let expected = c0 * (-k * dt * step as f64).exp();
            let got = f.value(cell).unwrap();
            assert!(rel_close(got, expected, 1e-9), "step {step}: {got} vs {expected}");
        }
    }

    #[test]
    fn zero_decay_zero_diffusion_conserves_mass() {
        let mut f = unit_field(4, 0.0, 0.0);
        f.set_concentration(CellIndex::new(0, 3, 2), 7.0).unwrap();
        for _ in 0..50 {
            f.advance(0.2).unwrap();
        }
        assert_eq!(f.total_quantity(), 7.0);
    }
}

// ── Diffusion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod diffusion_tests {
    use ms_core::{Bounds, Vec3};

    use super::helpers::{rel_close, unit_field};
    use crate::{CellIndex, FieldConfig, FieldError, MAX_SUBSTEPS, SpatialField};

    #[test]
    fn mass_invariant_and_peak_strictly_decreasing() {
        // D·dt/Δ² = 0.1, s = 0.3: a single stable step.
        let mut f = unit_field(11, 1.0, 0.0);
        f.set_concentration(CellIndex::new(5, 5, 5), 1.0e3).unwrap();
        let mass0 = f.total_quantity();
        let mut peak = f.peak_concentration();
        for _ in 0..20 {
            let report = f.advance(0.1).unwrap();
            assert_eq!(report.substeps, 1);
            assert!(rel_close(f.total_quantity(), mass0, 1e-12));
            let next = f.peak_concentration();
            assert!(next < peak, "peak did not drop: {next} >= {peak}");
            peak = next;
        }
    }

    #[test]
    fn spreads_symmetrically() {
        let mut f = unit_field(9, 1.0, 0.0);
        f.set_concentration(CellIndex::new(4, 4, 4), 1.0).unwrap();
        f.advance(0.1).unwrap();
        let left = f.value(CellIndex::new(3, 4, 4)).unwrap();
        let right = f.value(CellIndex::new(5, 4, 4)).unwrap();
        let up = f.value(CellIndex::new(4, 4, 5)).unwrap();
        assert!(left > 0.0);
        assert!(rel_close(left, right, 1e-12));
        assert!(rel_close(left, up, 1e-12));
    }

    #[test]
    fn zero_flux_boundary_keeps_mass_at_corner() {
        let mut f = unit_field(5, 1.0, 0.0);
        f.set_concentration(CellIndex::new(0, 0, 0), 50.0).unwrap();
        for _ in 0..200 {
            f.advance(0.1).unwrap();
        }
        assert!(rel_close(f.total_quantity(), 50.0, 1e-10));
        // Long-run state approaches uniform.
        let mean = 50.0 / 125.0;
        assert!(f.cells().iter().all(|&c| (c - mean).abs() < 0.05 * mean));
    }

    #[test]
    fn unstable_step_is_substepped() {
        // Δ = 5, D = 890, dt = 0.01 → s = 890·0.01·3/25 = 1.068.
        let bounds = Bounds::from_size(100.0, 100.0, 100.0).unwrap();
        let mut f = SpatialField::new(bounds, FieldConfig::new([20, 20, 20], 890.0, 0.9)).unwrap();
        let st = f.stability(0.01);
        assert!(!st.stable);
        assert!((st.number - 1.068).abs() < 1e-9);
        assert_eq!(st.substeps, 3);

        f.add_quantity(Vec3::splat(50.0), 8.0e9 * 0.01).unwrap();
        let report = f.advance(0.01).unwrap();
        assert_eq!(report.substeps, 3);
        assert!(f.cells().iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn stays_non_negative_under_large_steps() {
        let mut f = unit_field(6, 5.0, 0.3);
        f.set_concentration(CellIndex::new(0, 0, 0), 1.0).unwrap();
        f.set_concentration(CellIndex::new(5, 2, 3), 1.0e6).unwrap();
        for dt in [0.01, 1.0, 3.7, 0.5, 10.0] {
            f.advance(dt).unwrap();
            assert!(f.cells().iter().all(|&c| c >= 0.0 && c.is_finite()));
        }
    }

    #[test]
    fn single_cell_axes_do_not_count() {
        let bounds = Bounds::from_size(10.0, 1.0, 1.0).unwrap();
        let f = SpatialField::new(bounds, FieldConfig::new([10, 1, 1], 1.0, 0.0)).unwrap();
        let st = f.stability(0.25);
        assert!((st.number - 0.25).abs() < 1e-12);
        assert!(st.stable);
    }

    #[test]
    fn zero_diffusivity_takes_no_substeps() {
        let mut f = unit_field(3, 0.0, 0.5);
        assert_eq!(f.advance(1.0).unwrap().substeps, 0);
    }

    #[test]
    fn substep_cap_is_inclusive() {
        // One diffusing axis with unit cells: s = D·dt.
        let bounds = Bounds::from_size(10.0, 1.0, 1.0).unwrap();
        let f = SpatialField::new(bounds, FieldConfig::new([10, 1, 1], 1.0, 0.0)).unwrap();

        let at_cap = f.check_stability(5000.0).unwrap();
        assert_eq!(at_cap.substeps, MAX_SUBSTEPS);
        assert!(matches!(
            f.check_stability(5000.5),
            Err(FieldError::TooManySubsteps { limit: MAX_SUBSTEPS, .. })
        ));
    }

    #[test]
    fn excessive_substeps_rejected_without_touching_grid() {
        let bounds = Bounds::from_size(100.0, 100.0, 100.0).unwrap();
        let mut f = SpatialField::new(bounds, FieldConfig::new([20, 20, 20], 1.0e15, 0.0)).unwrap();
        f.set_concentration(CellIndex::new(3, 3, 3), 2.0).unwrap();
        f.add_quantity(Vec3::splat(50.0), 125.0).unwrap();

        let err = f.advance(1.0).unwrap_err();
        assert!(matches!(err, FieldError::TooManySubsteps { .. }), "{err}");
        assert_eq!(f.value(CellIndex::new(3, 3, 3)).unwrap(), 2.0);
        assert_eq!(f.total_quantity(), 2.0 * 125.0);
        assert_eq!(f.pending_quantity(), 125.0);
    }
}
