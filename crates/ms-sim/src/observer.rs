//! Simulation observer trait for progress reporting and data collection.

use ms_agent::AgentStore;
use ms_core::Tick;
use ms_field::SpatialField;

use crate::{SimWarning, TickReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_ticks`][crate::Sim::run_ticks] between phases of the loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers never feed back into a tick.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.tick.0 % self.interval == 0 {
///             println!("t = {:.2} s: {} activated", report.elapsed_secs, report.activated);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after each successfully committed tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called once per warning raised during `tick`, before `on_tick_end`.
    fn on_warning(&mut self, _tick: Tick, _warning: &SimWarning) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks), after the field update.  `time_secs` is the simulated time at
    /// the end of `tick`.
    fn on_snapshot(
        &mut self,
        _tick:      Tick,
        _time_secs: f64,
        _agents:    &AgentStore,
        _field:     &SpatialField,
    ) {}

    /// Called once when the simulation reaches `Stopped` inside a run call.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
