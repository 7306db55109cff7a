//! Per-agent capability descriptions.
//!
//! An agent is a point with a radius that may, independently:
//!
//! - **sense**: compare the local concentration against a threshold
//!   ([`Sensor`]);
//! - **emit**: produce chemical at a constant rate ([`Emitter`]);
//! - **move**: wander with a non-zero speed.
//!
//! Any combination is valid, including none at all.

use ms_core::Vec3;

use crate::{AgentError, AgentResult};

/// Threshold detector.  The agent is activated while the concentration at
/// its position is strictly greater than `threshold`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sensor {
    pub threshold: f64,
}

/// Constant-rate chemical source.  Emits `production_rate * dt` per tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emitter {
    pub production_rate: f64,
}

/// Capability summary for one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub senses: bool,
    pub emits:  bool,
    pub moves:  bool,
}

// ── AgentSpec ─────────────────────────────────────────────────────────────────

/// Initial state of one agent, handed to
/// [`AgentStoreBuilder::agent`](crate::AgentStoreBuilder::agent).
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSpec {
    pub position:  Vec3,
    pub radius:    f64,
    pub speed:     f64,
    pub activated: bool,
    pub sensor:    Option<Sensor>,
    pub emitter:   Option<Emitter>,
}

impl AgentSpec {
    /// A stationary, inert point agent at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: 0.0,
            speed: 0.0,
            activated: false,
            sensor: None,
            emitter: None,
        }
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn sensor(mut self, threshold: f64) -> Self {
        self.sensor = Some(Sensor { threshold });
        self
    }

    pub fn emitter(mut self, production_rate: f64) -> Self {
        self.emitter = Some(Emitter { production_rate });
        self
    }

    pub fn activated(mut self, activated: bool) -> Self {
        self.activated = activated;
        self
    }

    /// Check the numeric invariants.  `index` only labels the error.
    pub fn validate(&self, index: usize) -> AgentResult<()> {
        let invalid = |reason: String| Err(AgentError::InvalidSpec { index, reason });

        if !self.position.is_finite() {
            return invalid(format!("position {} is not finite", self.position));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return invalid(format!("radius must be finite and >= 0, got {}", self.radius));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return invalid(format!("speed must be finite and >= 0, got {}", self.speed));
        }
        if let Some(s) = self.sensor {
            if !s.threshold.is_finite() {
                return invalid(format!("sensor threshold {} is not finite", s.threshold));
            }
        }
        if let Some(e) = self.emitter {
            if !e.production_rate.is_finite() || e.production_rate < 0.0 {
                return invalid(format!(
                    "production rate must be finite and >= 0, got {}",
                    e.production_rate
                ));
            }
        }
        Ok(())
    }
}
