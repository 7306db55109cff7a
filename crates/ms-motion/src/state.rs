//! Per-agent motion state.

use ms_core::Vec3;

/// State a motion model carries from one tick to the next.
///
/// Only run-and-tumble uses it today: `direction` is the unit heading of the
/// current run, or zero before the first run has started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub direction: Vec3,
}

impl MotionState {
    /// `true` once a heading has been chosen.
    #[inline]
    pub fn has_heading(&self) -> bool {
        self.direction != Vec3::ZERO
    }
}
