//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to simulated seconds is held in `SimClock`:
//!
//!   elapsed_secs = tick * dt
//!
//! Elapsed time is always recomputed from the integer tick instead of being
//! accumulated, so it never drifts no matter how many ticks have run.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Validate a time step: finite and strictly positive.
pub fn check_dt(dt: f64) -> CoreResult<f64> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(CoreError::InvalidDt(dt))
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-step simulation clock.
///
/// Only the scheduler calls [`advance`](Self::advance); everything else reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub dt: f64,
    /// The current tick, advanced once per completed tick.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new(dt: f64) -> CoreResult<Self> {
        Ok(Self { dt: check_dt(dt)?, current_tick: Tick::ZERO })
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.dt
    }

    /// How many ticks span `secs` seconds?  Rounds up, except that a value
    /// within floating-point noise of a whole number of ticks is not bumped
    /// (`20.0 / 0.01` is 2000 ticks, not 2001).
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        ticks_for(secs, self.dt)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3} s)", self.current_tick, self.elapsed_secs())
    }
}

fn ticks_for(secs: f64, dt: f64) -> u64 {
    if secs <= 0.0 {
        return 0;
    }
    let raw = secs / dt;
    let nearest = raw.round();
    if (raw - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest as u64
    } else {
        raw.ceil() as u64
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Built programmatically by applications or decoded from a JSON scenario by
/// `ms-sim`, then passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per tick.  Must be finite and > 0.
    pub dt: f64,

    /// Total ticks to simulate.  20 s at dt = 0.01 is 2000 ticks.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// Configuration covering `duration_secs` of simulated time.
    pub fn for_duration(dt: f64, duration_secs: f64, seed: u64) -> CoreResult<Self> {
        let dt = check_dt(dt)?;
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "run duration must be finite and >= 0, got {duration_secs}"
            )));
        }
        Ok(Self {
            dt,
            total_ticks: ticks_for(duration_secs, dt),
            seed,
            num_threads: None,
            output_interval_ticks: 1,
        })
    }

    /// Check the invariants that cannot be expressed in the type.
    pub fn validate(&self) -> CoreResult<()> {
        check_dt(self.dt)?;
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be > 0 when set".into()));
        }
        Ok(())
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }
}
