//! Unit tests for ms-motion.

use ms_core::{AgentId, AgentRng, Bounds, Vec3};

use crate::{BoundaryPolicy, MotionEngine, MotionKind, RandomWalk};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn box100() -> Bounds {
    Bounds::from_size(100.0, 100.0, 100.0).unwrap()
}

fn rng(agent: u32) -> AgentRng {
    AgentRng::new(42, AgentId(agent))
}

// ── BoundaryPolicy ────────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary_tests {
    use super::*;

    #[test]
    fn inside_is_untouched() {
        let mut dir = Vec3::new(1.0, 0.0, 0.0);
        let p = Vec3::new(10.0, 20.0, 30.0);
        assert_eq!(BoundaryPolicy::Reflect.apply(p, &mut dir, &box100()), p);
        assert_eq!(BoundaryPolicy::Clamp.apply(p, &mut dir, &box100()), p);
        assert_eq!(dir, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn reflect_mirrors_overshoot_and_flips_heading() {
        let mut dir = Vec3::new(1.0, -1.0, 0.0);
        let p = Vec3::new(103.0, -2.0, 50.0);
        let out = BoundaryPolicy::Reflect.apply(p, &mut dir, &box100());
        assert!((out.x - 97.0).abs() < 1e-12);
        assert!((out.y - 2.0).abs() < 1e-12);
        assert_eq!(out.z, 50.0);
        assert_eq!(dir, Vec3::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn reflect_folds_multiple_times() {
        // 250 → crosses 100 (→ -50 side) and 0: lands at 50 after two folds.
        let mut dir = Vec3::new(1.0, 0.0, 0.0);
        let out = BoundaryPolicy::Reflect.apply(Vec3::new(250.0, 1.0, 1.0), &mut dir, &box100());
        assert!((out.x - 50.0).abs() < 1e-9);
        assert_eq!(dir.x, 1.0, "two crossings leave the heading unchanged");
    }

    #[test]
    fn clamp_stops_at_face() {
        let mut dir = Vec3::ZERO;
        let out = BoundaryPolicy::Clamp.apply(Vec3::new(-5.0, 120.0, 50.0), &mut dir, &box100());
        assert_eq!(out, Vec3::new(0.0, 100.0, 50.0));
    }
}

// ── Models ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model_tests {
    use super::*;
    use crate::{MotionError, MotionModel, MotionState, RunAndTumble, Stationary};

    #[test]
    fn random_walk_step_is_bounded_per_axis() {
        let mut r = rng(0);
        let mut s = MotionState::default();
        for _ in 0..1000 {
            let d = RandomWalk.displacement(&mut s, 2.0, 0.5, &mut r);
            assert!(d.x.abs() <= 1.0 && d.y.abs() <= 1.0 && d.z.abs() <= 1.0);
        }
    }

    #[test]
    fn stationary_never_moves() {
        let mut s = MotionState::default();
        assert_eq!(Stationary.displacement(&mut s, 100.0, 1.0, &mut rng(0)), Vec3::ZERO);
    }

    #[test]
    fn run_and_tumble_moves_at_speed() {
        let model = RunAndTumble::new(1.0).unwrap();
        let mut s = MotionState::default();
        let mut r = rng(3);
        for _ in 0..100 {
            let d = model.displacement(&mut s, 20.0, 0.01, &mut r);
            assert!((d.norm() - 0.2).abs() < 1e-9);
        }
        assert!(s.has_heading());
    }

    #[test]
    fn run_and_tumble_keeps_heading_without_tumbles() {
        // Tumble probability per tick = 1e-12.
        let model = RunAndTumble::new(1.0e10).unwrap();
        let mut s = MotionState::default();
        let mut r = rng(5);
        let first = model.displacement(&mut s, 1.0, 0.01, &mut r);
        for _ in 0..50 {
            assert_eq!(model.displacement(&mut s, 1.0, 0.01, &mut r), first);
        }
    }

    #[test]
    fn run_and_tumble_rejects_bad_mean() {
        assert!(matches!(RunAndTumble::new(0.0), Err(MotionError::Config(_))));
        assert!(MotionKind::RunAndTumble { mean_run_secs: -1.0 }.validate().is_err());
        assert!(MotionKind::RandomWalk.validate().is_ok());
    }
}

// ── MotionEngine ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::MotionError;

    #[test]
    fn zero_speed_never_moves_or_draws() {
        let engine = MotionEngine::new(RandomWalk, BoundaryPolicy::Reflect, 1);
        let mut r1 = rng(0);
        let p = Vec3::splat(50.0);
        let prop = engine.propose(AgentId(0), p, 0.0, 1.0, &box100(), &mut r1).unwrap();
        assert_eq!(prop.position, p);

        let mut r2 = rng(0);
        let a: u64 = r1.random();
        let b: u64 = r2.random();
        assert_eq!(a, b, "stationary agent consumed randomness");
    }

    #[test]
    fn proposals_stay_inside_bounds() {
        let engine = MotionEngine::new(MotionKind::RandomWalk, BoundaryPolicy::Reflect, 1);
        let bounds = box100();
        let mut r = rng(1);
        let mut p = Vec3::new(0.5, 99.5, 50.0);
        for _ in 0..2000 {
            p = engine.propose(AgentId(0), p, 50.0, 0.1, &bounds, &mut r).unwrap().position;
            assert!(bounds.contains(p), "escaped to {p}");
        }
    }

    #[test]
    fn propose_does_not_commit_state() {
        let mut engine = MotionEngine::new(
            MotionKind::RunAndTumble { mean_run_secs: 2.0 },
            BoundaryPolicy::Reflect,
            2,
        );
        let mut r = rng(0);
        let prop = engine
            .propose(AgentId(1), Vec3::splat(50.0), 1.0, 0.1, &box100(), &mut r)
            .unwrap();
        assert!(!engine.state(AgentId(1)).has_heading());
        engine.commit(AgentId(1), prop.state);
        assert!(engine.state(AgentId(1)).has_heading());
    }

    #[test]
    fn non_finite_target_is_an_error() {
        let engine = MotionEngine::new(RandomWalk, BoundaryPolicy::Clamp, 1);
        let mut r = rng(0);
        let err = engine
            .propose(AgentId(0), Vec3::splat(50.0), f64::INFINITY, 1.0, &box100(), &mut r)
            .unwrap_err();
        assert!(matches!(err, MotionError::NonFinite { agent: AgentId(0), .. }));
    }

    #[test]
    fn same_seed_same_path() {
        let engine = MotionEngine::new(RandomWalk, BoundaryPolicy::Reflect, 1);
        let run = || {
            let mut r = rng(7);
            let mut p = Vec3::splat(50.0);
            for _ in 0..100 {
                p = engine.propose(AgentId(0), p, 3.0, 0.1, &box100(), &mut r).unwrap().position;
            }
            p
        };
        assert_eq!(run(), run());
    }
}
