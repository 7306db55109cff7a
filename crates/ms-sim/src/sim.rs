//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use ms_agent::{AgentRngs, AgentStore};
use ms_behavior::{BehaviorModel, Intent, SimContext};
use ms_core::{AgentId, AgentRng, SimConfig, Tick, Vec3, World};
use ms_field::{FieldError, SpatialField};
use ms_motion::{MotionEngine, MotionModel, Proposal};

use crate::{SimError, SimObserver, SimResult, SimWarning, TickFailureCause, TickReport};

// ── Run state ─────────────────────────────────────────────────────────────────

/// Lifecycle of a [`Sim`].
///
/// `Idle` until the first tick, `Running` while ticks are being processed,
/// `Stopped` after `config.total_ticks` ticks or an explicit [`Sim::stop`].
/// `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
}

/// Everything one agent wants to do this tick, computed in the proposal phase.
///
/// `rng` is the agent's RNG after the draws of this tick; it replaces the
/// stored one only when the tick commits.
struct AgentProposal {
    intents: Vec<Intent>,
    motion:  Proposal,
    rng:     AgentRng,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B, M>` owns all mutable state (agents, RNGs, field, motion state)
/// and is the only thing that writes to it.  See the crate docs for the
/// per-tick phase order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BehaviorModel, M: MotionModel> {
    /// Global configuration (dt, total ticks, seed, …).
    pub config: SimConfig,

    /// The behavior model.  Called once per agent per tick.
    pub behavior: B,

    pub(crate) world:  World,
    pub(crate) agents: AgentStore,
    pub(crate) rngs:   AgentRngs,
    pub(crate) field:  SpatialField,
    pub(crate) motion: MotionEngine<M>,
    pub(crate) state:  RunState,

    /// Set once a tick has committed; the stability warning is not repeated after.
    pub(crate) stability_checked: bool,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<B: BehaviorModel, M: MotionModel> Sim<B, M> {
    // ── Read-only snapshot access ─────────────────────────────────────────

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    #[inline]
    pub fn field(&self) -> &SpatialField {
        &self.field
    }

    #[inline]
    pub fn motion(&self) -> &MotionEngine<M> {
        &self.motion
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// `true` once no further tick will run.
    pub fn is_finished(&self) -> bool {
        self.state == RunState::Stopped || self.world.tick() >= self.config.end_tick()
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Stop the simulation.  Takes effect between ticks; later calls to
    /// [`tick`](Self::tick) return [`SimError::Stopped`].
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            info!(tick = self.world.tick().0, "simulation stopped");
            self.state = RunState::Stopped;
        }
    }

    /// Run until the simulation is `Stopped`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.is_finished() {
            self.step(observer)?;
        }
        self.finish(observer);
        Ok(())
    }

    /// Run at most `n` ticks from the current position, ending early if the
    /// simulation stops.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            if self.is_finished() {
                break;
            }
            self.step(observer)?;
        }
        if self.is_finished() {
            self.finish(observer);
        }
        Ok(())
    }

    /// Process exactly one tick.
    ///
    /// On `Err(SimError::TickFailure { .. })` nothing has been committed and
    /// the simulation is still `Running`.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        if self.state == RunState::Stopped {
            return Err(SimError::Stopped);
        }
        if self.world.tick() >= self.config.end_tick() {
            self.stop();
            return Err(SimError::Stopped);
        }
        if self.state == RunState::Idle {
            info!(
                agents = self.agents.count,
                total_ticks = self.config.total_ticks,
                dt = self.world.dt(),
                "simulation started"
            );
            self.state = RunState::Running;
        }

        let now = self.world.tick();
        let dt = self.world.dt();
        let mut warnings = Vec::new();

        // Rejects a step the field could not take, before anything commits.
        let st = self.field.check_stability(dt).map_err(|e| SimError::TickFailure {
            tick:  now,
            agent: None,
            cause: TickFailureCause::Field(e),
        })?;
        // Raised once, by the first tick that commits.
        if !self.stability_checked && !st.stable {
            warn!(
                stability_number = st.number,
                substeps = st.substeps,
                "diffusion step is unstable at this dt; sub-stepping"
            );
            warnings.push(SimWarning::UnstableDiffusion {
                stability_number: st.number,
                substeps:         st.substeps,
            });
        }

        // ── Phase 1: proposals (no writes) ────────────────────────────────
        let proposals = self.propose(now)?;

        // Reject bad emission amounts before anything is committed.
        for (i, p) in proposals.iter().enumerate() {
            for amount in p.intents.iter().filter_map(Intent::emitted_amount) {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(SimError::TickFailure {
                        tick:  now,
                        agent: Some(AgentId(i as u32)),
                        cause: TickFailureCause::InvalidEmission(FieldError::InvalidQuantity(
                            amount,
                        )),
                    });
                }
            }
        }

        // ── Phase 2: commit, ascending AgentId ────────────────────────────
        let mut emitted = 0.0;
        let mut dropped = 0;
        for (i, p) in proposals.into_iter().enumerate() {
            let agent = AgentId(i as u32);
            let here = self.agents.position[i];
            for intent in p.intents {
                let (at, amount) = match intent {
                    Intent::Emit { amount }             => (here, amount),
                    Intent::EmitAt { position, amount } => (position, amount),
                    Intent::SetActivated(on) => {
                        self.agents.activated[i] = on;
                        continue;
                    }
                };
                if self.emit(agent, at, amount, &mut warnings) {
                    emitted += amount;
                } else {
                    dropped += 1;
                }
            }
            self.agents.position[i] = p.motion.position;
            self.motion.commit(agent, p.motion.state);
            self.rngs.inner[i] = p.rng;
        }
        self.stability_checked = true;

        // ── Phase 3: field ────────────────────────────────────────────────
        let field_report = self.field.advance(dt).map_err(|e| SimError::TickFailure {
            tick:  now,
            agent: None,
            cause: TickFailureCause::Field(e),
        })?;

        // ── Phase 4: clock ────────────────────────────────────────────────
        self.world.advance();

        let report = TickReport {
            tick:               now,
            elapsed_secs:       self.world.elapsed_secs(),
            activated:          self.agents.activated_count(),
            emitted_quantity:   emitted,
            dropped_emissions:  dropped,
            field:              field_report,
            total_quantity:     self.field.total_quantity(),
            peak_concentration: self.field.peak_concentration(),
            warnings,
        };
        debug!(
            tick = now.0,
            activated = report.activated,
            total_quantity = report.total_quantity,
            "tick complete"
        );

        if self.world.tick() >= self.config.end_tick() {
            self.stop();
        }
        Ok(report)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickReport> {
        let now = self.world.tick();
        observer.on_tick_start(now);
        let report = self.tick()?;
        for w in &report.warnings {
            observer.on_warning(now, w);
        }
        observer.on_tick_end(&report);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, self.world.elapsed_secs(), &self.agents, &self.field);
        }
        Ok(report)
    }

    fn finish<O: SimObserver>(&mut self, observer: &mut O) {
        self.stop();
        observer.on_sim_end(self.world.tick());
    }

    /// Buffer one emission.  Returns `false` if it fell outside the world.
    fn emit(
        &mut self,
        agent:    AgentId,
        at:       Vec3,
        amount:   f64,
        warnings: &mut Vec<SimWarning>,
    ) -> bool {
        // Amounts were validated before the commit started; only the
        // position can be rejected here.
        match self.field.add_quantity(at, amount) {
            Ok(()) => true,
            Err(e) => {
                warn!(agent = agent.0, position = %at, error = %e, "emission dropped");
                warnings.push(SimWarning::EmissionOutOfBounds { agent, position: at });
                false
            }
        }
    }

    /// Behave then move, for every agent.  With the `parallel` feature the
    /// agents are processed on Rayon's pool; either way the result is in
    /// ascending `AgentId` order and the first failing agent wins.
    ///
    /// Each agent draws from a copy of its RNG, so a failed tick leaves
    /// every stored RNG untouched.
    fn propose(&self, now: Tick) -> SimResult<Vec<AgentProposal>> {
        let agents   = &self.agents;
        let behavior = &self.behavior;
        let motion   = &self.motion;
        let bounds   = self.world.bounds;
        let dt       = self.world.dt();
        let rngs     = &self.rngs;

        let ctx = SimContext::new(now, dt, self.world.elapsed_secs(), agents, &self.field);

        let one = |i: usize, stored: &AgentRng| -> SimResult<AgentProposal> {
            let mut rng = stored.clone();
            let agent = AgentId(i as u32);
            let fail = |cause| SimError::TickFailure { tick: now, agent: Some(agent), cause };

            let intents = behavior
                .behave(agent, &ctx, &mut rng)
                .map_err(|e| fail(TickFailureCause::Behavior(e)))?;
            let motion = motion
                .propose(agent, agents.position[i], agents.speed[i], dt, &bounds, &mut rng)
                .map_err(|e| fail(TickFailureCause::Motion(e)))?;
            Ok(AgentProposal { intents, motion, rng })
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = rngs.inner.iter().enumerate().map(|(i, rng)| one(i, rng)).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<_> = {
            use rayon::prelude::*;

            let run = || {
                rngs.inner
                    .par_iter()
                    .enumerate()
                    .map(|(i, rng)| one(i, rng))
                    .collect::<Vec<_>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None       => run(),
            }
        };

        results.into_iter().collect()
    }
}
