//! The `MotionModel` trait and the built-in models.

use ms_core::{AgentRng, Vec3};

use crate::{MotionError, MotionResult, MotionState};

/// Pluggable stochastic motion.
///
/// `displacement` is only called for agents with `speed > 0`.  It may update
/// `state`; the engine hands it a copy and discards the copy if the tick
/// fails.
pub trait MotionModel: Send + Sync + 'static {
    fn displacement(
        &self,
        state: &mut MotionState,
        speed: f64,
        dt:    f64,
        rng:   &mut AgentRng,
    ) -> Vec3;
}

// ── Stationary ────────────────────────────────────────────────────────────────

/// Agents never move, whatever their speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stationary;

impl MotionModel for Stationary {
    fn displacement(&self, _: &mut MotionState, _: f64, _: f64, _: &mut AgentRng) -> Vec3 {
        Vec3::ZERO
    }
}

// ── RandomWalk ────────────────────────────────────────────────────────────────

/// Independent uniform jitter on each axis, `[-1, 1] * speed * dt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalk;

impl MotionModel for RandomWalk {
    fn displacement(
        &self,
        _state: &mut MotionState,
        speed:  f64,
        dt:     f64,
        rng:    &mut AgentRng,
    ) -> Vec3 {
        let step = speed * dt;
        Vec3::new(rng.symmetric(), rng.symmetric(), rng.symmetric()) * step
    }
}

// ── RunAndTumble ──────────────────────────────────────────────────────────────

/// Straight runs at `speed` along a unit heading, interrupted by tumbles to a
/// fresh uniformly random heading.
///
/// Run lengths are geometric in ticks with mean `mean_run_secs`: each tick
/// the agent tumbles with probability `dt / mean_run_secs`.
#[derive(Debug, Clone, Copy)]
pub struct RunAndTumble {
    mean_run_secs: f64,
}

impl RunAndTumble {
    pub fn new(mean_run_secs: f64) -> MotionResult<Self> {
        if !mean_run_secs.is_finite() || mean_run_secs <= 0.0 {
            return Err(MotionError::Config(format!(
                "mean run duration must be finite and > 0, got {mean_run_secs}"
            )));
        }
        Ok(Self { mean_run_secs })
    }

    #[inline]
    pub fn mean_run_secs(&self) -> f64 {
        self.mean_run_secs
    }
}

impl MotionModel for RunAndTumble {
    fn displacement(
        &self,
        state: &mut MotionState,
        speed: f64,
        dt:    f64,
        rng:   &mut AgentRng,
    ) -> Vec3 {
        if !state.has_heading() || rng.gen_bool(dt / self.mean_run_secs) {
            state.direction = rng.unit_vector();
        }
        state.direction * (speed * dt)
    }
}

// ── MotionKind ────────────────────────────────────────────────────────────────

/// Runtime-selected motion model, as named in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum MotionKind {
    Stationary,
    #[default]
    RandomWalk,
    RunAndTumble { mean_run_secs: f64 },
}

impl MotionKind {
    pub fn validate(&self) -> MotionResult<()> {
        if let MotionKind::RunAndTumble { mean_run_secs } = *self {
            RunAndTumble::new(mean_run_secs)?;
        }
        Ok(())
    }
}

impl MotionModel for MotionKind {
    fn displacement(
        &self,
        state: &mut MotionState,
        speed: f64,
        dt:    f64,
        rng:   &mut AgentRng,
    ) -> Vec3 {
        match *self {
            MotionKind::Stationary => Stationary.displacement(state, speed, dt, rng),
            MotionKind::RandomWalk => RandomWalk.displacement(state, speed, dt, rng),
            MotionKind::RunAndTumble { mean_run_secs } => {
                RunAndTumble { mean_run_secs }.displacement(state, speed, dt, rng)
            }
        }
    }
}
