//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`
//! - `field_cells.csv` (header only unless field cells are enabled)

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, FieldCellRow, OutputResult, TickSummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    cells:     Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record([
            "agent_id", "tick", "time_secs", "x", "y", "z", "radius", "activated", "concentration",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "elapsed_secs",
            "activated_agents",
            "emitted_quantity",
            "total_quantity",
            "peak_concentration",
            "substeps",
        ])?;

        let mut cells = Writer::from_path(dir.join("field_cells.csv"))?;
        cells.write_record(["tick", "x", "y", "z", "concentration"])?;

        Ok(Self { snapshots, summaries, cells, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.time_secs.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.radius.to_string(),
                (row.activated as u8).to_string(),
                row.concentration.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_field_cells(&mut self, rows: &[FieldCellRow]) -> OutputResult<()> {
        for row in rows {
            self.cells.write_record(&[
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.concentration.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_secs.to_string(),
            row.activated_agents.to_string(),
            row.emitted_quantity.to_string(),
            row.total_quantity.to_string(),
            row.peak_concentration.to_string(),
            row.substeps.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.cells.flush()?;
        Ok(())
    }
}
