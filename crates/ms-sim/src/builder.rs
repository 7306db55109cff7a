//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use ms_agent::{AgentRngs, AgentStore};
use ms_behavior::BehaviorModel;
use ms_core::{Bounds, SimConfig, World};
use ms_field::{FieldConfig, SpatialField};
use ms_motion::{BoundaryPolicy, MotionEngine, MotionKind, MotionModel};

use crate::{RunState, Scenario, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<B, M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: dt, total ticks, seed, …
/// - [`Bounds`]: the world box
/// - [`AgentStore`] + [`AgentRngs`]: from [`ms_agent::AgentStoreBuilder`]
/// - `B: BehaviorModel`: the behavior implementation
/// - `M: MotionModel`: the motion model (e.g. [`ms_motion::RandomWalk`])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                        |
/// |----------------------|------------------------------------------------|
/// | `.field_config(c)`   | 1×1×1 grid, no diffusion, no decay             |
/// | `.initial_field(f)`  | All-zero field built from the field config     |
/// | `.boundary(p)`       | `BoundaryPolicy::Reflect`                      |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(seed).agents(specs).build()?;
/// let mut sim = SimBuilder::new(config, bounds, store, rngs, SignallingBehavior, RandomWalk)
///     .field_config(FieldConfig::new([20, 20, 20], 890.0, 0.9))
///     .boundary(BoundaryPolicy::Clamp)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BehaviorModel, M: MotionModel> {
    config:       SimConfig,
    bounds:       Bounds,
    agents:       AgentStore,
    rngs:         AgentRngs,
    behavior:     B,
    motion:       M,
    field_config: Option<FieldConfig>,
    field:        Option<SpatialField>,
    boundary:     BoundaryPolicy,
}

impl<B: BehaviorModel, M: MotionModel> SimBuilder<B, M> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SimConfig,
        bounds:   Bounds,
        agents:   AgentStore,
        rngs:     AgentRngs,
        behavior: B,
        motion:   M,
    ) -> Self {
        Self {
            config,
            bounds,
            agents,
            rngs,
            behavior,
            motion,
            field_config: None,
            field:        None,
            boundary:     BoundaryPolicy::default(),
        }
    }

    /// Resolution and coefficients of the chemical field.
    pub fn field_config(mut self, config: FieldConfig) -> Self {
        self.field_config = Some(config);
        self
    }

    /// Start from a pre-seeded field instead of an all-zero one.
    ///
    /// Its bounds must equal the world bounds.  Takes precedence over
    /// [`field_config`](Self::field_config).
    pub fn initial_field(mut self, field: SpatialField) -> Self {
        self.field = Some(field);
        self
    }

    pub fn boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = policy;
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`] in the `Idle` state.
    pub fn build(self) -> SimResult<Sim<B, M>> {
        self.config.validate()?;
        let agent_count = self.agents.count;

        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }
        for (i, &p) in self.agents.position.iter().enumerate() {
            if !self.bounds.contains(p) {
                return Err(SimError::Config(format!(
                    "agent #{i} starts at {p}, outside world bounds {}",
                    self.bounds
                )));
            }
        }

        let world = World::new(self.bounds, self.config.dt)?;

        let field = match self.field {
            Some(f) => {
                if f.grid().bounds() != &self.bounds {
                    return Err(SimError::Config(format!(
                        "initial field covers {}, world is {}",
                        f.grid().bounds(),
                        self.bounds
                    )));
                }
                f
            }
            None => {
                let cfg = self.field_config.unwrap_or_else(|| FieldConfig::new([1, 1, 1], 0.0, 0.0));
                SpatialField::new(self.bounds, cfg)?
            }
        };
        field.check_stability(self.config.dt)?;

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        info!(
            agents = agent_count,
            dims = ?field.dims(),
            bounds = %self.bounds,
            "simulation built"
        );

        Ok(Sim {
            motion:            MotionEngine::new(self.motion, self.boundary, agent_count),
            config:            self.config,
            behavior:          self.behavior,
            world,
            agents:            self.agents,
            rngs:              self.rngs,
            field,
            state:             RunState::Idle,
            stability_checked: false,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}

impl<B: BehaviorModel> SimBuilder<B, MotionKind> {
    /// Builder pre-filled from a [`Scenario`]: config, bounds, field,
    /// motion model and boundary policy.
    pub fn from_scenario(
        scenario: &Scenario,
        agents:   AgentStore,
        rngs:     AgentRngs,
        behavior: B,
    ) -> SimResult<Self> {
        let builder = SimBuilder::new(
            scenario.sim_config()?,
            scenario.bounds()?,
            agents,
            rngs,
            behavior,
            scenario.motion,
        );
        Ok(builder
            .field_config(scenario.field.clone())
            .boundary(scenario.boundary))
    }
}
