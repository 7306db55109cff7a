//! JSON scenario files.
//!
//! # Format
//!
//! ```json
//! {
//!   "world":    { "min": [0, 0, 0], "max": [100, 100, 100] },
//!   "dt":       0.01,
//!   "duration_secs": 20.0,
//!   "seed":     42,
//!   "output_interval_ticks": 10,
//!   "field":    { "resolution": [20, 20, 20], "diffusivity": 890.0, "decay_rate": 0.9 },
//!   "motion":   { "kind": "random_walk" },
//!   "boundary": "reflect"
//! }
//! ```
//!
//! Exactly one of `duration_secs` / `total_ticks` must be given.  `world.min`
//! defaults to the origin; `seed` to 0; `output_interval_ticks` to 1;
//! `motion` to a random walk; `boundary` to `reflect`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ms_core::{Bounds, SimConfig, Vec3};
use ms_field::FieldConfig;
use ms_motion::{BoundaryPolicy, MotionKind};

use crate::{SimError, SimResult};

/// World box as `[x, y, z]` corner arrays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldSpec {
    #[serde(default)]
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// A complete run description, minus the agent population.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub world: WorldSpec,
    pub dt:    f64,

    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub total_ticks:   Option<u64>,

    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub num_threads: Option<usize>,
    #[serde(default = "default_output_interval")]
    pub output_interval_ticks: u64,

    pub field: FieldConfig,

    #[serde(default)]
    pub motion:   MotionKind,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

fn default_output_interval() -> u64 {
    1
}

impl Scenario {
    pub fn from_json_str(s: &str) -> SimResult<Self> {
        serde_json::from_str(s).map_err(|e| SimError::Scenario(e.to_string()))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> SimResult<Self> {
        serde_json::from_reader(reader).map_err(|e| SimError::Scenario(e.to_string()))
    }

    pub fn from_path(path: &Path) -> SimResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn bounds(&self) -> SimResult<Bounds> {
        let [x0, y0, z0] = self.world.min;
        let [x1, y1, z1] = self.world.max;
        Ok(Bounds::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))?)
    }

    /// Resolve the run length and build a validated [`SimConfig`].
    pub fn sim_config(&self) -> SimResult<SimConfig> {
        self.motion.validate()?;
        let mut config = match (self.duration_secs, self.total_ticks) {
            (Some(secs), None) => SimConfig::for_duration(self.dt, secs, self.seed)?,
            (None, Some(total_ticks)) => SimConfig {
                dt: self.dt,
                total_ticks,
                seed: self.seed,
                num_threads: None,
                output_interval_ticks: 1,
            },
            (Some(_), Some(_)) => {
                return Err(SimError::Scenario(
                    "give either duration_secs or total_ticks, not both".into(),
                ));
            }
            (None, None) => {
                return Err(SimError::Scenario("missing duration_secs or total_ticks".into()));
            }
        };
        config.num_threads = self.num_threads;
        config.output_interval_ticks = self.output_interval_ticks;
        config.validate()?;
        Ok(config)
    }
}
