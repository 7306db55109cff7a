//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use ms_agent::{AgentSpec, AgentStoreBuilder};
//! use ms_core::Vec3;
//!
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .agent(AgentSpec::new(Vec3::splat(50.0)).emitter(8.0e9))
//!     .agent(AgentSpec::new(Vec3::splat(10.0)).sensor(1.0e4).speed(2.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(rngs.len(),  2);
//! ```

use crate::{AgentResult, AgentRngs, AgentSpec, AgentStore};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// Agents receive dense `AgentId`s in the order they are added.
pub struct AgentStoreBuilder {
    seed:  u64,
    specs: Vec<AgentSpec>,
}

impl AgentStoreBuilder {
    /// Create an empty builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, specs: Vec::new() }
    }

    /// Append one agent.
    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Append every agent yielded by `specs`, in order.
    pub fn agents(mut self, specs: impl IntoIterator<Item = AgentSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Validate every spec and construct `AgentStore` and `AgentRngs`.
    ///
    /// Fails on the first invalid spec; nothing is built in that case.
    pub fn build(self) -> AgentResult<(AgentStore, AgentRngs)> {
        for (i, spec) in self.specs.iter().enumerate() {
            spec.validate(i)?;
        }

        let count = self.specs.len();
        let mut store = AgentStore::with_capacity(count);
        for spec in self.specs {
            store.position.push(spec.position);
            store.radius.push(spec.radius);
            store.speed.push(spec.speed);
            store.activated.push(spec.activated);
            store.sensor.push(spec.sensor);
            store.emitter.push(spec.emitter);
        }
        store.count = count;

        let rngs = AgentRngs::new(count, self.seed);
        Ok((store, rngs))
    }
}
