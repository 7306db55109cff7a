//! signalling: one emitter, three sensors.
//!
//! A large emitting cell sits at the centre of a 100 µm cube and secretes a
//! signalling molecule into a 20×20×20 grid.  Three small sensing cells
//! wander in the box; one starts beside the emitter and two in opposite
//! corners.  The molecule diffuses and decays, so only the sensor near the
//! source ends up activated.
//!
//! Usage: `signalling [scenario.json]`.  Without an argument the bundled
//! scenario is used.  Output lands in `output/signalling/`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use ms_agent::{AgentStore, AgentStoreBuilder, load_population_reader};
use ms_behavior::SignallingBehavior;
use ms_core::Tick;
use ms_field::SpatialField;
use ms_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ms_sim::{Scenario, SimBuilder, SimObserver, SimWarning, TickReport};

// ── Inputs ────────────────────────────────────────────────────────────────────

const DEFAULT_SCENARIO: &str = include_str!("../scenario.json");

// Emitter: 8e9 molecules/s.  Sensors activate above 1e4 molecules/µm³.
const POPULATION_CSV: &str = "\
x,y,z,radius,speed,threshold,production_rate\n\
50,50,50,4,0,,8e9\n\
10,10,90,1,2,1e4,\n\
50,50,50,1,2,1e4,\n\
90,90,10,1,2,1e4,\n\
";

const OUTPUT_DIR: &str = "output/signalling";

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer and keeps a few counters for the summary.
struct CountingObserver<W: OutputWriter> {
    inner:          SimOutputObserver<W>,
    snapshot_rows:  usize,
    summary_rows:   usize,
    warnings:       usize,
    last_activated: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, warnings: 0, last_activated: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.summary_rows += 1;
        if report.activated != self.last_activated {
            info!(
                tick = report.tick.0,
                time = report.elapsed_secs,
                activated = report.activated,
                "activation changed"
            );
            self.last_activated = report.activated;
        }
        self.inner.on_tick_end(report);
    }

    fn on_warning(&mut self, tick: Tick, warning: &SimWarning) {
        self.warnings += 1;
        warn!(tick = tick.0, ?warning, "simulation warning");
    }

    fn on_snapshot(&mut self, tick: Tick, time: f64, agents: &AgentStore, field: &SpatialField) {
        self.snapshot_rows += agents.count;
        self.inner.on_snapshot(tick, time, agents, field);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    // 1. Scenario.
    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::from_path(Path::new(&path))
            .with_context(|| format!("loading scenario {path}"))?,
        None => Scenario::from_json_str(DEFAULT_SCENARIO)?,
    };
    let config = scenario.sim_config()?;

    println!("=== signalling ===");
    println!(
        "World: {}  |  Grid: {:?}  |  D = {}  |  k = {}",
        scenario.bounds()?,
        scenario.field.resolution,
        scenario.field.diffusivity,
        scenario.field.decay_rate,
    );
    println!(
        "Sim: {} ticks of {} s, output every {} ticks, seed {}",
        config.total_ticks, config.dt, config.output_interval_ticks, config.seed
    );

    // 2. Population.
    let specs = load_population_reader(Cursor::new(POPULATION_CSV))?;
    let (store, rngs) = AgentStoreBuilder::new(config.seed).agents(specs).build()?;
    println!("Agents: {}", store.count);
    println!();

    // 3. Sim.
    let mut sim = SimBuilder::from_scenario(&scenario, store, rngs, SignallingBehavior)?.build()?;
    let stability = sim.field().stability(config.dt);
    println!(
        "Diffusion stability number {:.3} → {} substep(s) per tick",
        stability.number, stability.substeps
    );

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer).with_field_cells(true));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  warnings            : {}", obs.warnings);
    println!(
        "  field               : total {:.3e}, peak {:.3e}",
        sim.field().total_quantity(),
        sim.field().peak_concentration()
    );
    println!();

    println!("{:<6} {:<28} {:<14} {:<9}", "Agent", "Position", "Conc.", "Active");
    println!("{}", "-".repeat(60));
    let agents = sim.agents();
    for i in 0..agents.count {
        let p = agents.position[i];
        println!(
            "{:<6} {:<28} {:<14.4e} {:<9}",
            i,
            format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
            sim.field().concentration(p),
            if agents.activated[i] { "yes" } else { "no" },
        );
    }

    Ok(())
}
