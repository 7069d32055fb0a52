//! Tabular outputs: the wide table, its statistics and class labels as CSV,
//! plus an optional Parquet copy of the wide table.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::data::model::{WideSpectrumTable, WAVELENGTH_COLUMN};
use crate::data::stats::{Summary, SUMMARY_ROWS};

/// Missing values are written as empty cells.
fn cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))
}

/// Header `wavelength,<key>...`, one row per wavelength, no index column.
pub fn write_wide_csv(path: &Path, table: &WideSpectrumTable) -> Result<()> {
    let mut writer = csv_writer(path)?;

    let header = std::iter::once(WAVELENGTH_COLUMN).chain(table.column_names());
    writer
        .write_record(header)
        .with_context(|| format!("writing header of {}", path.display()))?;

    for (row, w) in table.wavelength().iter().enumerate() {
        let record = std::iter::once(cell(*w))
            .chain(table.columns().iter().map(|c| cell(c.values[row])));
        writer
            .write_record(record)
            .with_context(|| format!("writing row {row} of {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// `describe`-shaped table: statistic names down the first column, one
/// column per summarized series.
pub fn write_summary_csv(path: &Path, summaries: &[(String, Summary)]) -> Result<()> {
    let mut writer = csv_writer(path)?;

    let header = std::iter::once("").chain(summaries.iter().map(|(name, _)| name.as_str()));
    writer
        .write_record(header)
        .with_context(|| format!("writing header of {}", path.display()))?;

    let rows: Vec<[f64; 8]> = summaries.iter().map(|(_, s)| s.as_row()).collect();
    for (i, stat) in SUMMARY_ROWS.iter().enumerate() {
        let record = std::iter::once(stat.to_string()).chain(rows.iter().map(|r| cell(r[i])));
        writer
            .write_record(record)
            .with_context(|| format!("writing '{stat}' row of {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// `sample,class` pairs in column order. Writes nothing for unlabelled tables.
pub fn write_labels_csv(path: &Path, table: &WideSpectrumTable) -> Result<bool> {
    let Some(labels) = table.labels() else {
        return Ok(false);
    };
    let mut writer = csv_writer(path)?;
    writer
        .write_record(["sample", "class"])
        .with_context(|| format!("writing header of {}", path.display()))?;
    for (name, label) in table.column_names().zip(labels) {
        writer
            .write_record([name, label.as_str()])
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(true)
}

/// Parquet copy of the wide table: one non-null Float64 column per table
/// column, wavelength first.
pub fn write_parquet(path: &Path, table: &WideSpectrumTable) -> Result<()> {
    let mut fields = vec![Field::new(WAVELENGTH_COLUMN, DataType::Float64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(table.wavelength().to_vec()))];
    for column in table.columns() {
        fields.push(Field::new(&column.name, DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(column.values.clone())));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
