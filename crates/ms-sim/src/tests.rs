//! Integration tests for ms-sim.

use std::sync::atomic::{AtomicBool, Ordering};

use ms_agent::{AgentRngs, AgentSpec, AgentStore, AgentStoreBuilder};
use ms_behavior::{
    BehaviorError, BehaviorModel, BehaviorResult, Intent, NoopBehavior, SignallingBehavior,
    SimContext,
};
use ms_core::{AgentId, AgentRng, Bounds, SimConfig, Tick, Vec3};
use ms_field::{FieldConfig, FieldError, SpatialField};
use ms_motion::{RandomWalk, Stationary};

use crate::{
    NoopObserver, RunState, SimBuilder, SimError, SimObserver, SimWarning, TickFailureCause,
    TickReport,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f64 = 0.01;

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        dt: DT,
        total_ticks,
        seed: 42,
        num_threads: Some(1),
        output_interval_ticks: 1,
    }
}

fn box100() -> Bounds {
    Bounds::from_size(100.0, 100.0, 100.0).unwrap()
}

fn store(specs: Vec<AgentSpec>) -> (AgentStore, AgentRngs) {
    AgentStoreBuilder::new(42).agents(specs).build().unwrap()
}

/// The signalling layout: one emitter at the centre, three sensors.
fn signalling_specs() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new(Vec3::splat(50.0)).radius(4.0).emitter(8.0e9),
        AgentSpec::new(Vec3::new(10.0, 10.0, 90.0)).radius(1.0).speed(5.0).sensor(1.0e4),
        AgentSpec::new(Vec3::new(50.0, 50.0, 50.0)).radius(1.0).speed(5.0).sensor(1.0e4),
        AgentSpec::new(Vec3::new(90.0, 90.0, 10.0)).radius(1.0).speed(5.0).sensor(1.0e4),
    ]
}

fn signalling_field() -> FieldConfig {
    FieldConfig::new([20, 20, 20], 890.0, 0.9)
}

/// Field with no transport: emitted quantity just accumulates.
fn inert_field() -> FieldConfig {
    FieldConfig::new([10, 10, 10], 0.0, 0.0)
}

/// Records every observer callback.
#[derive(Default)]
struct Recorder {
    starts:    Vec<Tick>,
    ends:      Vec<TickReport>,
    warnings:  Vec<(Tick, SimWarning)>,
    snapshots: Vec<(Tick, f64)>,
    ended:     Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }
    fn on_tick_end(&mut self, report: &TickReport) {
        self.ends.push(report.clone());
    }
    fn on_warning(&mut self, tick: Tick, warning: &SimWarning) {
        self.warnings.push((tick, warning.clone()));
    }
    fn on_snapshot(&mut self, tick: Tick, time: f64, _a: &AgentStore, _f: &SpatialField) {
        self.snapshots.push((tick, time));
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_idle_with_defaults() {
        let (s, r) = store(signalling_specs());
        let sim = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        assert_eq!(sim.state(), RunState::Idle);
        assert_eq!(sim.agents().count, 4);
        assert_eq!(sim.field().dims(), [1, 1, 1]);
        assert_eq!(sim.world().tick(), Tick(0));
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let (s, _) = store(signalling_specs());
        let (_, r) = store(vec![AgentSpec::new(Vec3::ZERO)]);
        let result = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 4, got: 1, .. })));
    }

    #[test]
    fn agent_outside_bounds_rejected() {
        let (s, r) = store(vec![AgentSpec::new(Vec3::new(50.0, 50.0, 101.0))]);
        let result = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_dt_rejected() {
        let (s, r) = store(vec![]);
        let mut cfg = test_config(10);
        cfg.dt = 0.0;
        let result = SimBuilder::new(cfg, box100(), s, r, NoopBehavior, RandomWalk).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn initial_field_must_cover_world() {
        let (s, r) = store(vec![]);
        let small = Bounds::from_size(10.0, 10.0, 10.0).unwrap();
        let field = SpatialField::new(small, inert_field()).unwrap();
        let result = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .initial_field(field)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn unreachable_diffusion_step_rejected() {
        let (s, r) = store(vec![]);
        let result = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .field_config(FieldConfig::new([20, 20, 20], 1.0e15, 0.0))
            .build();
        assert!(matches!(result, Err(SimError::Field(FieldError::TooManySubsteps { .. }))));
    }
}

// ── Run state and observer hooks ──────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn runs_to_end_and_stops() {
        let (s, r) = store(signalling_specs());
        let mut sim = SimBuilder::new(test_config(25), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.world().tick(), Tick(25));
        assert!((sim.world().elapsed_secs() - 0.25).abs() < 1e-12);
        assert_eq!(sim.state(), RunState::Stopped);
    }

    #[test]
    fn tick_after_stop_errors() {
        let (s, r) = store(vec![]);
        let mut sim = SimBuilder::new(test_config(3), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.state(), RunState::Running);
        sim.stop();
        assert_eq!(sim.state(), RunState::Stopped);
        assert!(matches!(sim.tick(), Err(SimError::Stopped)));
        assert_eq!(sim.world().tick(), Tick(1));
    }

    #[test]
    fn tick_past_end_errors() {
        let (s, r) = store(vec![]);
        let mut sim = SimBuilder::new(test_config(2), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        sim.tick().unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.state(), RunState::Stopped);
        assert!(matches!(sim.tick(), Err(SimError::Stopped)));
    }

    #[test]
    fn zero_tick_run_does_nothing() {
        let (s, r) = store(vec![]);
        let mut sim = SimBuilder::new(test_config(0), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();
        assert!(rec.starts.is_empty());
        assert_eq!(rec.ended, Some(Tick(0)));
        assert_eq!(sim.state(), RunState::Stopped);
    }

    #[test]
    fn observer_called_each_tick() {
        let (s, r) = store(signalling_specs());
        let mut cfg = test_config(10);
        cfg.output_interval_ticks = 5;
        let mut sim = SimBuilder::new(cfg, box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.starts.len(), 10);
        assert_eq!(rec.ends.len(), 10);
        assert_eq!(rec.ends[3].tick, Tick(3));
        let ticks: Vec<Tick> = rec.snapshots.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![Tick(0), Tick(5)]);
        assert!((rec.snapshots[1].1 - 0.06).abs() < 1e-12);
        assert_eq!(rec.ended, Some(Tick(10)));
    }

    #[test]
    fn run_ticks_steps_incrementally() {
        let (s, r) = store(vec![]);
        let mut sim = SimBuilder::new(test_config(10), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec).unwrap();
        assert_eq!(sim.world().tick(), Tick(4));
        assert_eq!(rec.ended, None);
        sim.run_ticks(100, &mut rec).unwrap();
        assert_eq!(sim.world().tick(), Tick(10));
        assert_eq!(rec.ended, Some(Tick(10)));
    }

    #[test]
    fn agents_stay_inside_world() {
        let specs = (0..20)
            .map(|i| AgentSpec::new(Vec3::new(1.0 + i as f64 * 4.9, 0.5, 99.5)).speed(400.0))
            .collect();
        let (s, r) = store(specs);
        let mut sim = SimBuilder::new(test_config(200), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        for _ in 0..200 {
            sim.tick().unwrap();
            assert!(sim.agents().position.iter().all(|&p| box100().contains(p)));
        }
    }

    #[test]
    fn stationary_agents_never_move() {
        let (s, r) = store(signalling_specs());
        let mut sim = SimBuilder::new(test_config(50), box100(), s, r, NoopBehavior, RandomWalk)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.agents().position[0], Vec3::splat(50.0));
        assert_ne!(sim.agents().position[1], Vec3::new(10.0, 10.0, 90.0));
    }
}

// ── Emission and sensing through the scheduler ────────────────────────────────

#[cfg(test)]
mod signalling_tests {
    use super::*;

    #[test]
    fn emitted_mass_is_conserved_without_transport() {
        let rate = 1000.0;
        let (s, r) = store(vec![AgentSpec::new(Vec3::splat(50.0)).emitter(rate)]);
        let mut sim = SimBuilder::new(test_config(100), box100(), s, r, SignallingBehavior, Stationary)
            .field_config(inert_field())
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        let expected = 100.0 * rate * DT;
        assert!((sim.field().total_quantity() - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn emissions_are_invisible_within_the_same_tick() {
        // Sensor shares the emitter's cell with threshold 0.
        let (s, r) = store(vec![
            AgentSpec::new(Vec3::splat(50.0)).emitter(1.0),
            AgentSpec::new(Vec3::splat(51.0)).sensor(0.0),
        ]);
        let mut sim = SimBuilder::new(test_config(5), box100(), s, r, SignallingBehavior, Stationary)
            .field_config(inert_field())
            .build()
            .unwrap();

        let first = sim.tick().unwrap();
        assert_eq!(first.activated, 0, "sensor saw an emission from its own tick");
        assert!(sim.field().total_quantity() > 0.0);

        let second = sim.tick().unwrap();
        assert_eq!(second.activated, 1);
        assert!(sim.agents().activated[1]);
    }

    #[test]
    fn near_field_exceeds_far_field() {
        let (s, r) = store(signalling_specs());
        let mut sim = SimBuilder::new(test_config(200), box100(), s, r, SignallingBehavior, RandomWalk)
            .field_config(signalling_field())
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        let near = sim.field().concentration(Vec3::splat(50.0));
        let far = sim.field().concentration(Vec3::new(10.0, 10.0, 90.0));
        assert!(near > far, "near {near} <= far {far}");
        assert!(sim.agents().activated[2], "centre sensor should be activated");
        assert!(sim.field().cells().iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn unstable_diffusion_warned_once() {
        let (s, r) = store(signalling_specs());
        let mut sim = SimBuilder::new(test_config(5), box100(), s, r, SignallingBehavior, RandomWalk)
            .field_config(signalling_field())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.warnings.len(), 1);
        let (tick, warning) = &rec.warnings[0];
        assert_eq!(*tick, Tick(0));
        assert!(matches!(warning, SimWarning::UnstableDiffusion { substeps: 3, .. }));
        assert!(rec.ends.iter().all(|r| r.field.substeps == 3));
    }

    struct EmitOutside;

    impl BehaviorModel for EmitOutside {
        fn behave(
            &self,
            _agent: AgentId,
            _ctx:   &SimContext<'_>,
            _rng:   &mut AgentRng,
        ) -> BehaviorResult<Vec<Intent>> {
            Ok(vec![
                Intent::EmitAt { position: Vec3::new(-1.0, 50.0, 50.0), amount: 5.0 },
                Intent::Emit { amount: 2.0 },
            ])
        }
    }

    #[test]
    fn out_of_bounds_emission_is_dropped_with_warning() {
        let (s, r) = store(vec![AgentSpec::new(Vec3::splat(50.0))]);
        let mut sim = SimBuilder::new(test_config(1), box100(), s, r, EmitOutside, Stationary)
            .field_config(inert_field())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        let report = &rec.ends[0];
        assert_eq!(report.dropped_emissions, 1);
        assert_eq!(report.emitted_quantity, 2.0);
        assert!(matches!(
            rec.warnings[0].1,
            SimWarning::EmissionOutOfBounds { agent: AgentId(0), .. }
        ));
        assert!((sim.field().total_quantity() - 2.0).abs() < 1e-12);
    }
}

// ── Tick failure ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use super::*;

    /// Signalling behavior that fails for one agent on one tick while armed.
    struct FailOnce {
        tick:  Tick,
        agent: AgentId,
        armed: AtomicBool,
    }

    impl BehaviorModel for FailOnce {
        fn behave(
            &self,
            agent: AgentId,
            ctx:   &SimContext<'_>,
            rng:   &mut AgentRng,
        ) -> BehaviorResult<Vec<Intent>> {
            if ctx.tick == self.tick && agent == self.agent && self.armed.load(Ordering::SeqCst) {
                return Err(BehaviorError::Failed { agent, reason: "sensor fault".into() });
            }
            SignallingBehavior.behave(agent, ctx, rng)
        }
    }

    fn fail_once_sim(tick: Tick, armed: bool) -> crate::Sim<FailOnce, RandomWalk> {
        let (s, r) = store(signalling_specs());
        let behavior = FailOnce { tick, agent: AgentId(2), armed: AtomicBool::new(armed) };
        SimBuilder::new(test_config(10), box100(), s, r, behavior, RandomWalk)
            .field_config(signalling_field())
            .build()
            .unwrap()
    }

    #[test]
    fn failed_tick_commits_nothing_and_can_resume() {
        let mut sim = fail_once_sim(Tick(3), true);
        sim.run_ticks(3, &mut NoopObserver).unwrap();

        let positions = sim.agents().position.clone();
        let activated = sim.agents().activated.clone();
        let cells = sim.field().cells().to_vec();

        let err = sim.tick().unwrap_err();
        match err {
            SimError::TickFailure { tick, agent, cause } => {
                assert_eq!(tick, Tick(3));
                assert_eq!(agent, Some(AgentId(2)));
                assert!(matches!(cause, TickFailureCause::Behavior(_)));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(sim.state(), RunState::Running);
        assert_eq!(sim.world().tick(), Tick(3));
        assert_eq!(sim.agents().position, positions);
        assert_eq!(sim.agents().activated, activated);
        assert_eq!(sim.field().cells(), cells.as_slice());
        assert_eq!(sim.field().pending_quantity(), 0.0);

        sim.behavior.armed.store(false, Ordering::SeqCst);
        let report = sim.tick().unwrap();
        assert_eq!(report.tick, Tick(3));
        assert_eq!(sim.world().tick(), Tick(4));
    }

    #[test]
    fn retried_tick_matches_uninterrupted_run() {
        let mut clean = fail_once_sim(Tick(3), false);
        clean.run(&mut NoopObserver).unwrap();

        let mut retried = fail_once_sim(Tick(3), true);
        assert!(retried.run(&mut NoopObserver).is_err());
        retried.behavior.armed.store(false, Ordering::SeqCst);
        retried.run(&mut NoopObserver).unwrap();

        assert_eq!(retried.agents().position, clean.agents().position);
        assert_eq!(retried.agents().activated, clean.agents().activated);
        assert_eq!(retried.field().cells(), clean.field().cells());
    }

    #[test]
    fn unstable_warning_survives_failed_first_tick() {
        let mut sim = fail_once_sim(Tick(0), true);
        let mut rec = Recorder::default();
        assert!(sim.run(&mut rec).is_err());
        assert!(rec.warnings.is_empty());

        sim.behavior.armed.store(false, Ordering::SeqCst);
        sim.run(&mut rec).unwrap();
        assert_eq!(rec.warnings.len(), 1);
        assert_eq!(rec.warnings[0].0, Tick(0));
        assert!(matches!(rec.warnings[0].1, SimWarning::UnstableDiffusion { substeps: 3, .. }));
    }

    struct NegativeEmitter;

    impl BehaviorModel for NegativeEmitter {
        fn behave(
            &self,
            agent: AgentId,
            _ctx:  &SimContext<'_>,
            _rng:  &mut AgentRng,
        ) -> BehaviorResult<Vec<Intent>> {
            let amount = if agent == AgentId(1) { -1.0 } else { 1.0 };
            Ok(vec![Intent::Emit { amount }, Intent::SetActivated(true)])
        }
    }

    #[test]
    fn invalid_emission_fails_the_tick() {
        let (s, r) = store(vec![
            AgentSpec::new(Vec3::splat(20.0)),
            AgentSpec::new(Vec3::splat(80.0)),
        ]);
        let mut sim = SimBuilder::new(test_config(5), box100(), s, r, NegativeEmitter, Stationary)
            .field_config(inert_field())
            .build()
            .unwrap();
        let err = sim.tick().unwrap_err();
        assert!(matches!(
            err,
            SimError::TickFailure {
                agent: Some(AgentId(1)),
                cause: TickFailureCause::InvalidEmission(_),
                ..
            }
        ));
        assert_eq!(sim.field().pending_quantity(), 0.0);
        assert_eq!(sim.field().total_quantity(), 0.0);
        assert_eq!(sim.agents().activated_count(), 0);
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism_tests {
    use super::*;

    fn run_with_seed(seed: u64) -> (Vec<Vec3>, Vec<f64>) {
        let (s, r) = AgentStoreBuilder::new(seed).agents(signalling_specs()).build().unwrap();
        let mut cfg = test_config(60);
        cfg.seed = seed;
        let mut sim = SimBuilder::new(cfg, box100(), s, r, SignallingBehavior, RandomWalk)
            .field_config(signalling_field())
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        (sim.agents().position.clone(), sim.field().cells().to_vec())
    }

    #[test]
    fn same_seed_identical_results() {
        assert_eq!(run_with_seed(7), run_with_seed(7));
    }

    #[test]
    fn different_seed_different_paths() {
        assert_ne!(run_with_seed(7).0, run_with_seed(8).0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn thread_count_does_not_change_results() {
        let run_with_threads = |n: usize| {
            let (s, r) = store(signalling_specs());
            let mut cfg = test_config(60);
            cfg.num_threads = Some(n);
            let mut sim = SimBuilder::new(cfg, box100(), s, r, SignallingBehavior, RandomWalk)
                .field_config(signalling_field())
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap();
            (
                sim.agents().position.clone(),
                sim.agents().activated.clone(),
                sim.field().cells().to_vec(),
            )
        };
        assert_eq!(run_with_threads(4), run_with_threads(1));
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use ms_motion::{BoundaryPolicy, MotionKind};

    use super::*;
    use crate::Scenario;

    const JSON: &str = r#"{
        "world": { "max": [100, 100, 100] },
        "dt": 0.01,
        "duration_secs": 20.0,
        "seed": 5,
        "output_interval_ticks": 10,
        "field": { "resolution": [20, 20, 20], "diffusivity": 890.0, "decay_rate": 0.9 },
        "motion": { "kind": "run_and_tumble", "mean_run_secs": 1.5 },
        "boundary": "clamp"
    }"#;

    #[test]
    fn parses_full_scenario() {
        let sc = Scenario::from_json_str(JSON).unwrap();
        assert_eq!(sc.bounds().unwrap(), box100());
        assert_eq!(sc.motion, MotionKind::RunAndTumble { mean_run_secs: 1.5 });
        assert_eq!(sc.boundary, BoundaryPolicy::Clamp);

        let cfg = sc.sim_config().unwrap();
        assert_eq!(cfg.total_ticks, 2000);
        assert_eq!(cfg.seed, 5);
        assert_eq!(cfg.output_interval_ticks, 10);
    }

    #[test]
    fn defaults_apply() {
        let sc = Scenario::from_json_str(
            r#"{ "world": { "max": [1, 1, 1] }, "dt": 0.1, "total_ticks": 7,
                 "field": { "resolution": [2, 2, 2], "diffusivity": 0.0, "decay_rate": 0.0 } }"#,
        )
        .unwrap();
        assert_eq!(sc.motion, MotionKind::RandomWalk);
        assert_eq!(sc.boundary, BoundaryPolicy::Reflect);
        assert_eq!(sc.sim_config().unwrap().total_ticks, 7);
        assert_eq!(sc.output_interval_ticks, 1);
    }

    #[test]
    fn run_length_must_be_unambiguous() {
        let both = JSON.replace("\"seed\": 5", "\"seed\": 5, \"total_ticks\": 3");
        assert!(matches!(
            Scenario::from_json_str(&both).unwrap().sim_config(),
            Err(SimError::Scenario(_))
        ));
        let neither = JSON.replace("\"duration_secs\": 20.0,", "");
        assert!(Scenario::from_json_str(&neither).unwrap().sim_config().is_err());
    }

    #[test]
    fn malformed_json_is_scenario_error() {
        assert!(matches!(Scenario::from_json_str("{ nope"), Err(SimError::Scenario(_))));
    }

    #[test]
    fn builder_from_scenario() {
        let sc = Scenario::from_json_str(JSON).unwrap();
        let (s, r) = store(signalling_specs());
        let mut sim = SimBuilder::from_scenario(&sc, s, r, SignallingBehavior)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(sim.field().dims(), [20, 20, 20]);
        sim.run_ticks(20, &mut NoopObserver).unwrap();
        assert!(sim.agents().position.iter().all(|&p| box100().contains(p)));
    }
}
