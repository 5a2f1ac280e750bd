//! Parquet persistence of generated populations
//!
//! The flat file has one row per unit with columns `sim_id, Z1, Z2, Z3, X, Y`.
//! Rows of a replicate are written as one record batch.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::data::model::{UnitRecord, columns};
use crate::data::population::Population;
use crate::data::table::Replicate;
use crate::error::{Result, SimulationError};
use crate::utils::{log_operation_complete, log_operation_start};

/// Arrow schema of the flat population file
#[must_use]
pub fn unit_record_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::SIM_ID, DataType::UInt32, false),
        Field::new(columns::Z1, DataType::Float64, false),
        Field::new(columns::Z2, DataType::Float64, false),
        Field::new(columns::Z3, DataType::Int32, false),
        Field::new(columns::X, DataType::Int32, false),
        Field::new(columns::Y, DataType::Float64, false),
    ])
}

fn schema_fields() -> Vec<FieldRef> {
    unit_record_schema()
        .fields()
        .iter()
        .map(Arc::clone)
        .collect()
}

/// Convert unit records to an Arrow record batch
pub fn records_to_batch(records: &[UnitRecord]) -> Result<RecordBatch> {
    serde_arrow::to_record_batch(&schema_fields(), &records)
        .map_err(|e| SimulationError::serialization("Failed to convert unit records", e))
}

/// Convert an Arrow record batch back to unit records
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<UnitRecord>> {
    let schema = batch.schema();
    for field in unit_record_schema().fields() {
        if schema.index_of(field.name()).is_err() {
            return Err(SimulationError::MissingColumn(field.name().clone()));
        }
    }
    serde_arrow::from_record_batch(batch)
        .map_err(|e| SimulationError::serialization("Failed to read unit records", e))
}

/// Write every replicate of a population to a single Parquet file
pub fn write_population(path: &Path, population: &Population) -> Result<()> {
    let start = Instant::now();
    log_operation_start("Writing population to", path);

    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, Arc::new(unit_record_schema()), Some(props))?;

    for replicate in population.replicates() {
        let records: Vec<UnitRecord> = replicate.records().collect();
        let batch = records_to_batch(&records)?;
        writer.write(&batch)?;
    }
    writer.close()?;

    log_operation_complete("wrote", path, population.total_units(), Some(start.elapsed()));
    Ok(())
}

/// Read a population written by [`write_population`]
///
/// Rows are regrouped by `sim_id`; replicates come back in identifier order.
pub fn read_population(path: &Path) -> Result<Population> {
    let start = Instant::now();
    log_operation_start("Reading population from", path);

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(batch_to_records(&batch?)?);
    }
    let total = records.len();

    let replicates = records
        .into_iter()
        .sorted_by_key(|r| r.replicate_id)
        .chunk_by(|r| r.replicate_id)
        .into_iter()
        .map(|(id, group)| {
            let rows: Vec<UnitRecord> = group.collect();
            Replicate::from_records(id, &rows)
        })
        .collect::<Result<Vec<_>>>()?;

    let population = Population::new(replicates)?;
    log_operation_complete("read", path, total, Some(start.elapsed()));
    Ok(population)
}
