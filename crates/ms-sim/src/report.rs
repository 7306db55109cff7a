//! Per-tick results and non-fatal diagnostics.

use ms_core::{AgentId, Tick, Vec3};
use ms_field::AdvanceReport;

/// A non-fatal condition detected during a tick.
///
/// Warnings are logged with `tracing::warn!`, collected in the
/// [`TickReport`], and forwarded to
/// [`SimObserver::on_warning`](crate::SimObserver::on_warning).
#[derive(Debug, Clone, PartialEq)]
pub enum SimWarning {
    /// An emission targeted a position outside the world and was dropped.
    EmissionOutOfBounds { agent: AgentId, position: Vec3 },

    /// One explicit diffusion step of `dt` would be unstable; the field
    /// sub-steps every advance.  Raised once per run, at the first tick.
    UnstableDiffusion { stability_number: f64, substeps: u32 },
}

/// Summary of one completed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The tick that was processed.
    pub tick: Tick,
    /// Simulated seconds at the end of the tick.
    pub elapsed_secs: f64,
    /// Agents activated after the commit.
    pub activated: usize,
    /// Quantity buffered into the field this tick.
    pub emitted_quantity: f64,
    /// Emissions dropped because they fell outside the world.
    pub dropped_emissions: usize,
    /// What the field update did.
    pub field: AdvanceReport,
    /// Field state after the update.
    pub total_quantity:     f64,
    pub peak_concentration: f64,
    pub warnings: Vec<SimWarning>,
}
