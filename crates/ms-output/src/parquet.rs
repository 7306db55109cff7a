//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.parquet`
//! - `tick_summaries.parquet`
//! - `field_cells.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::{OutputWriter, ensure_dir};
use crate::{AgentSnapshotRow, FieldCellRow, OutputResult, TickSummaryRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id",      DataType::UInt32,  false),
        Field::new("tick",          DataType::UInt64,  false),
        Field::new("time_secs",     DataType::Float64, false),
        Field::new("x",             DataType::Float64, false),
        Field::new("y",             DataType::Float64, false),
        Field::new("z",             DataType::Float64, false),
        Field::new("radius",        DataType::Float64, false),
        Field::new("activated",     DataType::Boolean, false),
        Field::new("concentration", DataType::Float64, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",               DataType::UInt64,  false),
        Field::new("elapsed_secs",       DataType::Float64, false),
        Field::new("activated_agents",   DataType::UInt64,  false),
        Field::new("emitted_quantity",   DataType::Float64, false),
        Field::new("total_quantity",     DataType::Float64, false),
        Field::new("peak_concentration", DataType::Float64, false),
        Field::new("substeps",           DataType::UInt32,  false),
    ]))
}

fn cell_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",          DataType::UInt64,  false),
        Field::new("x",             DataType::UInt32,  false),
        Field::new("y",             DataType::UInt32,  false),
        Field::new("z",             DataType::UInt32,  false),
        Field::new("concentration", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    snapshots:   Option<ArrowWriter<File>>,
    summaries:   Option<ArrowWriter<File>>,
    cells:       Option<ArrowWriter<File>>,
    snap_schema: Arc<Schema>,
    summ_schema: Arc<Schema>,
    cell_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create the Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        ensure_dir(dir)?;

        let snap_schema = snapshot_schema();
        let summ_schema = summary_schema();
        let cell_schema = cell_schema();

        Ok(Self {
            snapshots: Some(open(dir, "agent_snapshots.parquet", &snap_schema)?),
            summaries: Some(open(dir, "tick_summaries.parquet", &summ_schema)?),
            cells:     Some(open(dir, "field_cells.parquet", &cell_schema)?),
            snap_schema,
            summ_schema,
            cell_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut agent_ids      = UInt32Builder::new();
        let mut ticks          = UInt64Builder::new();
        let mut times          = Float64Builder::new();
        let mut xs             = Float64Builder::new();
        let mut ys             = Float64Builder::new();
        let mut zs             = Float64Builder::new();
        let mut radii          = Float64Builder::new();
        let mut activated      = BooleanBuilder::new();
        let mut concentrations = Float64Builder::new();

        for row in rows {
            agent_ids.append_value(row.agent_id);
            ticks.append_value(row.tick);
            times.append_value(row.time_secs);
            xs.append_value(row.x);
            ys.append_value(row.y);
            zs.append_value(row.z);
            radii.append_value(row.radius);
            activated.append_value(row.activated);
            concentrations.append_value(row.concentration);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(agent_ids.finish()),
            Arc::new(ticks.finish()),
            Arc::new(times.finish()),
            Arc::new(xs.finish()),
            Arc::new(ys.finish()),
            Arc::new(zs.finish()),
            Arc::new(radii.finish()),
            Arc::new(activated.finish()),
            Arc::new(concentrations.finish()),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&self.snap_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_field_cells(&mut self, rows: &[FieldCellRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.cells.as_mut() else {
            return Ok(());
        };

        let mut ticks          = UInt64Builder::new();
        let mut xs             = UInt32Builder::new();
        let mut ys             = UInt32Builder::new();
        let mut zs             = UInt32Builder::new();
        let mut concentrations = Float64Builder::new();

        for row in rows {
            ticks.append_value(row.tick);
            xs.append_value(row.x);
            ys.append_value(row.y);
            zs.append_value(row.z);
            concentrations.append_value(row.concentration);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(ticks.finish()),
            Arc::new(xs.finish()),
            Arc::new(ys.finish()),
            Arc::new(zs.finish()),
            Arc::new(concentrations.finish()),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&self.cell_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut ticks     = UInt64Builder::new();
        let mut elapsed   = Float64Builder::new();
        let mut activated = UInt64Builder::new();
        let mut emitted   = Float64Builder::new();
        let mut total     = Float64Builder::new();
        let mut peak      = Float64Builder::new();
        let mut substeps  = UInt32Builder::new();

        ticks.append_value(row.tick);
        elapsed.append_value(row.elapsed_secs);
        activated.append_value(row.activated_agents);
        emitted.append_value(row.emitted_quantity);
        total.append_value(row.total_quantity);
        peak.append_value(row.peak_concentration);
        substeps.append_value(row.substeps);

        let columns: Vec<ArrayRef> = vec![
            Arc::new(ticks.finish()),
            Arc::new(elapsed.finish()),
            Arc::new(activated.finish()),
            Arc::new(emitted.finish()),
            Arc::new(total.finish()),
            Arc::new(peak.finish()),
            Arc::new(substeps.finish()),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&self.summ_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for slot in [&mut self.snapshots, &mut self.summaries, &mut self.cells] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
