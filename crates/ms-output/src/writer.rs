//! The `OutputWriter` trait implemented by all backend writers.

use std::path::Path;

use crate::{AgentSnapshotRow, FieldCellRow, OutputError, OutputResult, TickSummaryRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors are stored by the observer and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write a batch of field cells.
    fn write_field_cells(&mut self, rows: &[FieldCellRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Calling it again is a no-op.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Backends write into an existing directory; they never create it.
pub(crate) fn ensure_dir(dir: &Path) -> OutputResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(OutputError::MissingDir(dir.to_path_buf()))
    }
}
