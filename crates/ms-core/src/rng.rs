//! Deterministic per-agent RNG.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! This means:
//!
//! - Agents never share RNG state, so a parallel behavior phase draws the
//!   same numbers as a sequential one.
//! - Adding agents at the end of the population does not disturb the
//!   trajectories of existing agents.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec3};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Created once per agent by `ms-agent` and stored in a parallel
/// `Vec<AgentRng>` alongside the SoA arrays.  Cloning forks the stream:
/// the copy yields the same numbers as the original from that point on.
#[derive(Clone)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform sample in `[-1, 1]`.
    #[inline]
    pub fn symmetric(&mut self) -> f64 {
        self.0.gen_range(-1.0..=1.0)
    }

    /// Uniformly distributed unit vector (rejection-sampled from the unit ball).
    pub fn unit_vector(&mut self) -> Vec3 {
        loop {
            let v = Vec3::new(self.symmetric(), self.symmetric(), self.symmetric());
            let n2 = v.norm_squared();
            if n2 > 1e-12 && n2 <= 1.0 {
                return v / n2.sqrt();
            }
        }
    }
}
