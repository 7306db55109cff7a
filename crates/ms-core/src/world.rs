//! The simulation `World`: bounding box plus clock.

use crate::{Bounds, CoreResult, SimClock, Tick};

/// Domain geometry and global time shared by every component.
///
/// The bounds never change after construction.  The clock is advanced once
/// per completed tick by the scheduler and nowhere else.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub bounds: Bounds,
    pub clock:  SimClock,
}

impl World {
    /// Build a world; fails fast on a non-positive or non-finite `dt`.
    pub fn new(bounds: Bounds, dt: f64) -> CoreResult<Self> {
        Ok(Self { bounds, clock: SimClock::new(dt)? })
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.clock.dt
    }

    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Move time forward by one `dt`.
    #[inline]
    pub fn advance(&mut self) {
        self.clock.advance();
    }
}
