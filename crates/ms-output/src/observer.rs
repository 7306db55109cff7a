//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use ms_agent::AgentStore;
use ms_core::Tick;
use ms_field::SpatialField;
use ms_sim::{SimObserver, TickReport};

use crate::row::{AgentSnapshotRow, FieldCellRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots, tick summaries and
/// (optionally) field cells to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:      W,
    field_cells: bool,
    last_error:  Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`.  Field cells are off by default.
    pub fn new(writer: W) -> Self {
        Self { writer, field_cells: false, last_error: None }
    }

    /// Also export every non-zero field cell at each snapshot.
    pub fn with_field_cells(mut self, enabled: bool) -> Self {
        self.field_cells = enabled;
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let row = TickSummaryRow {
            tick:               report.tick.0,
            elapsed_secs:       report.elapsed_secs,
            activated_agents:   report.activated as u64,
            emitted_quantity:   report.emitted_quantity,
            total_quantity:     report.total_quantity,
            peak_concentration: report.peak_concentration,
            substeps:           report.field.substeps,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, time: f64, agents: &AgentStore, field: &SpatialField) {
        let rows: Vec<AgentSnapshotRow> = (0..agents.count)
            .map(|i| {
                let p = agents.position[i];
                AgentSnapshotRow {
                    agent_id:      i as u32,
                    tick:          tick.0,
                    time_secs:     time,
                    x:             p.x,
                    y:             p.y,
                    z:             p.z,
                    radius:        agents.radius[i],
                    activated:     agents.activated[i],
                    concentration: field.concentration(p),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }

        if self.field_cells {
            let grid = field.grid();
            let cells: Vec<FieldCellRow> = field
                .cells()
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c != 0.0)
                .map(|(i, &c)| {
                    let cell = grid.unlinear(i);
                    FieldCellRow {
                        tick:          tick.0,
                        x:             cell.x as u32,
                        y:             cell.y as u32,
                        z:             cell.z as u32,
                        concentration: c,
                    }
                })
                .collect();
            if !cells.is_empty() {
                let result = self.writer.write_field_cells(&cells);
                self.store_err(result);
            }
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
