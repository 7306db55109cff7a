//! CSV population loader.
//!
//! # CSV format
//!
//! One row per agent, in `AgentId` order.  `threshold` and `production_rate`
//! may be left empty for agents that do not sense or do not emit.
//!
//! ```csv
//! x,y,z,radius,speed,threshold,production_rate
//! 50,50,50,4,0,,8e9
//! 10,10,90,1,2,1e4,
//! 90,90,10,1,2,1e4,
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ms_core::Vec3;

use crate::{AgentError, AgentResult, AgentSpec, Emitter, Sensor};

#[derive(Deserialize)]
struct PopulationRecord {
    x:               f64,
    y:               f64,
    z:               f64,
    radius:          f64,
    speed:           f64,
    threshold:       Option<f64>,
    production_rate: Option<f64>,
}

/// Load agent specs from a CSV file.
///
/// Specs are returned unvalidated; pass them to
/// [`AgentStoreBuilder::agents`](crate::AgentStoreBuilder::agents), whose
/// `build` reports bad rows by index.
pub fn load_population_csv(path: &Path) -> AgentResult<Vec<AgentSpec>> {
    let file = std::fs::File::open(path).map_err(AgentError::Io)?;
    load_population_reader(file)
}

/// Like [`load_population_csv`] but accepts any `Read` source.
pub fn load_population_reader<R: Read>(reader: R) -> AgentResult<Vec<AgentSpec>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    csv_reader
        .deserialize::<PopulationRecord>()
        .enumerate()
        .map(|(row, result)| {
            let r = result.map_err(|e| AgentError::Parse(format!("row {row}: {e}")))?;
            Ok(AgentSpec {
                position:  Vec3::new(r.x, r.y, r.z),
                radius:    r.radius,
                speed:     r.speed,
                activated: false,
                sensor:    r.threshold.map(|threshold| Sensor { threshold }),
                emitter:   r.production_rate.map(|production_rate| Emitter { production_rate }),
            })
        })
        .collect()
}
