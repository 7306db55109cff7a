//! What happens when a move would leave the world box.

use ms_core::{Axis, Bounds, Vec3};

/// Boundary handling for agent positions.  Periodic wrap is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryPolicy {
    /// Mirror the overshoot back into the box, folding as many times as
    /// needed, and flip the heading component on every odd fold.
    #[default]
    Reflect,
    /// Stop at the face.
    Clamp,
}

impl BoundaryPolicy {
    /// Map `p` into `bounds`.  `p` must be finite.
    pub fn apply(self, p: Vec3, direction: &mut Vec3, bounds: &Bounds) -> Vec3 {
        match self {
            BoundaryPolicy::Clamp => bounds.clamp(p),
            BoundaryPolicy::Reflect => {
                let mut out = p;
                for axis in Axis::ALL {
                    let (lo, hi) = (bounds.min.get(axis), bounds.max.get(axis));
                    let v = p.get(axis);
                    if v >= lo && v <= hi {
                        continue;
                    }
                    let (folded, flipped) = reflect(v, lo, hi);
                    out.set(axis, folded);
                    if flipped {
                        direction.set(axis, -direction.get(axis));
                    }
                }
                out
            }
        }
    }
}

/// Fold `v` into `[lo, hi]` by repeated mirroring.  Returns the folded value
/// and whether an odd number of faces was crossed.
fn reflect(v: f64, lo: f64, hi: f64) -> (f64, bool) {
    let span = hi - lo;
    let period = 2.0 * span;
    let crossings = ((v - lo) / span).floor();
    let odd = crossings.rem_euclid(2.0) == 1.0;

    let mut t = (v - lo).rem_euclid(period);
    if t > span {
        t = period - t;
    }
    ((lo + t).clamp(lo, hi), odd)
}
