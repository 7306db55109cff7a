//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `agent_snapshots`, `tick_summaries` and `field_cells`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, FieldCellRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;

        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id      INTEGER NOT NULL,
                 tick          INTEGER NOT NULL,
                 time_secs     REAL    NOT NULL,
                 x             REAL    NOT NULL,
                 y             REAL    NOT NULL,
                 z             REAL    NOT NULL,
                 radius        REAL    NOT NULL,
                 activated     INTEGER NOT NULL,
                 concentration REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick               INTEGER PRIMARY KEY,
                 elapsed_secs       REAL    NOT NULL,
                 activated_agents   INTEGER NOT NULL,
                 emitted_quantity   REAL    NOT NULL,
                 total_quantity     REAL    NOT NULL,
                 peak_concentration REAL    NOT NULL,
                 substeps           INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS field_cells (
                 tick          INTEGER NOT NULL,
                 x             INTEGER NOT NULL,
                 y             INTEGER NOT NULL,
                 z             INTEGER NOT NULL,
                 concentration REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, time_secs, x, y, z, radius, activated, concentration) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick,
                    row.time_secs,
                    row.x,
                    row.y,
                    row.z,
                    row.radius,
                    row.activated as i64,
                    row.concentration,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_field_cells(&mut self, rows: &[FieldCellRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO field_cells (tick, x, y, z, concentration) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.x, row.y, row.z, row.concentration])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, elapsed_secs, activated_agents, emitted_quantity, \
              total_quantity, peak_concentration, substeps) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.tick,
                row.elapsed_secs,
                row.activated_agents,
                row.emitted_quantity,
                row.total_quantity,
                row.peak_concentration,
                row.substeps,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
