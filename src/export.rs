// src/export.rs
use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use csv::WriterBuilder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use crate::table::{Entity, LongRecord, LongTable, ID_FIELDS};

/// Write `long` as CSV: identifier fields, `Year`, then `value_label`.
/// Missing values become empty cells.
#[tracing::instrument(level = "info", skip(long, path), fields(path = %path.as_ref().display()))]
pub fn write_long_csv<P: AsRef<Path>>(long: &LongTable, path: P, value_label: &str) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating CSV export {}", path.display()))?;

    let mut header: Vec<&str> = ID_FIELDS.to_vec();
    header.push("Year");
    header.push(value_label);
    wtr.write_record(&header)?;

    for rec in long.records() {
        let e = &rec.entity;
        let year = rec.year.to_string();
        let value = rec.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            e.name.as_str(),
            e.code.as_str(),
            e.indicator_name.as_str(),
            e.indicator_code.as_str(),
            year.as_str(),
            value.as_str(),
        ])
        .with_context(|| format!("writing CSV export {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing CSV export {}", path.display()))?;

    info!(rows = long.len(), "wrote CSV export");
    Ok(())
}

/// Arrow schema of the long table.
pub fn long_schema(value_label: &str) -> Schema {
    let mut fields: Vec<Field> = ID_FIELDS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    fields.push(Field::new("Year", DataType::Int32, false));
    fields.push(Field::new(value_label, DataType::Float64, true));
    Schema::new(fields)
}

fn utf8_column<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

pub fn to_record_batch(long: &LongTable, value_label: &str) -> Result<RecordBatch> {
    let recs = long.records();
    let columns: Vec<ArrayRef> = vec![
        utf8_column(recs.iter().map(|r| r.entity.name.as_str())),
        utf8_column(recs.iter().map(|r| r.entity.code.as_str())),
        utf8_column(recs.iter().map(|r| r.entity.indicator_name.as_str())),
        utf8_column(recs.iter().map(|r| r.entity.indicator_code.as_str())),
        Arc::new(Int32Array::from_iter_values(recs.iter().map(|r| r.year))),
        Arc::new(Float64Array::from_iter(recs.iter().map(|r| r.value))),
    ];

    RecordBatch::try_new(Arc::new(long_schema(value_label)), columns)
        .context("building long-table record batch")
}

fn write_batch<W: Write + Send>(sink: W, batch: &RecordBatch) -> Result<()> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(sink), batch.schema(), Some(props))
        .context("creating Parquet writer for long table")?;
    writer.write(batch).context("writing long table batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

/// Run `write` against `.<name>.tmp` beside `path`, then rename it over `path`.
/// On failure the temporary file is removed and `path` is left untouched.
fn write_via_tmp<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("export path {} has no file name", path.display()))?;
    let tmp: PathBuf = path.with_file_name(format!(".{}.tmp", file_name));

    let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    if let Err(e) = write(file) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))
}

/// Write `long` as a Snappy-compressed Parquet file.
///
/// Goes through `.<name>.tmp` in the same directory and is renamed into place
/// once the writer is closed. A failed write removes the temporary file.
#[tracing::instrument(level = "info", skip(long, path), fields(path = %path.as_ref().display()))]
pub fn write_long_parquet<P: AsRef<Path>>(
    long: &LongTable,
    path: P,
    value_label: &str,
) -> Result<()> {
    let batch = to_record_batch(long, value_label)?;
    write_via_tmp(path.as_ref(), |file| write_batch(file, &batch))?;

    info!(rows = long.len(), "wrote Parquet export");
    Ok(())
}

/// A Parquet export read back: its field names and records.
#[derive(Debug)]
pub struct ParquetLong {
    pub fields: Vec<String>,
    pub table: LongTable,
}

fn column_as<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    i: usize,
    fields: &[String],
) -> Result<&'a T> {
    batch
        .column(i)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("column `{}` has an unexpected type", fields[i]))
}

/// Read a file produced by [`write_long_parquet`].
pub fn read_long_parquet<P: AsRef<Path>>(path: P) -> Result<ParquetLong> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("`{}` is not a Parquet file", path.display()))?;
    let fields: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if fields.len() != 6 {
        bail!(
            "`{}` has {} columns, a long table has 6",
            path.display(),
            fields.len()
        );
    }

    let reader = builder.with_batch_size(1024).build()?;
    let mut records = Vec::new();
    for batch in reader {
        let batch = batch.context("reading Parquet batch")?;
        let names: &StringArray = column_as(&batch, 0, &fields)?;
        let codes: &StringArray = column_as(&batch, 1, &fields)?;
        let ind_names: &StringArray = column_as(&batch, 2, &fields)?;
        let ind_codes: &StringArray = column_as(&batch, 3, &fields)?;
        let years: &Int32Array = column_as(&batch, 4, &fields)?;
        let values: &Float64Array = column_as(&batch, 5, &fields)?;

        for i in 0..batch.num_rows() {
            records.push(LongRecord {
                entity: Arc::new(Entity {
                    name: names.value(i).to_string(),
                    code: codes.value(i).to_string(),
                    indicator_name: ind_names.value(i).to_string(),
                    indicator_code: ind_codes.value(i).to_string(),
                }),
                year: years.value(i),
                value: (!values.is_null(i)).then(|| values.value(i)),
            });
        }
    }

    Ok(ParquetLong {
        fields,
        table: LongTable::new(records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::long_from_csv;
    use anyhow::Result;
    use tempfile::tempdir;

    const CSV: &str = "\
Country Name,Country Code,Indicator Name,Indicator Code,2018,2019,notayear
\"Korea, Rep.\",KOR,GDP (current US$),NY.GDP.MKTP.CD,10,20,x
Chad,TCD,GDP (current US$),NY.GDP.MKTP.CD,,5.5,x
";

    #[test]
    fn test_csv_export() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("long.csv");
        write_long_csv(&long_from_csv(CSV), &path, "GDP (current US$)")?;

        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Country Name,Country Code,Indicator Name,Indicator Code,Year,GDP (current US$)",
                "\"Korea, Rep.\",KOR,GDP (current US$),NY.GDP.MKTP.CD,2018,10",
                "\"Korea, Rep.\",KOR,GDP (current US$),NY.GDP.MKTP.CD,2019,20",
                "Chad,TCD,GDP (current US$),NY.GDP.MKTP.CD,2018,",
                "Chad,TCD,GDP (current US$),NY.GDP.MKTP.CD,2019,5.5",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parquet_export_reads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("long.parquet");
        let long = long_from_csv(CSV);
        write_long_parquet(&long, &path, "GDP")?;

        assert!(!dir.path().join(".long.parquet.tmp").exists());
        let back = read_long_parquet(&path)?;
        assert_eq!(back.fields.last().map(String::as_str), Some("GDP"));
        assert_eq!(back.fields[4], "Year");
        assert_eq!(back.table, long);
        Ok(())
    }

    #[test]
    fn test_failed_write_removes_tmp_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("long.parquet");

        let err = write_via_tmp(&path, |mut file| {
            file.write_all(b"PAR1 partial")?;
            bail!("disk full")
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "disk full");
        assert!(!dir.path().join(".long.parquet.tmp").exists());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_schema_nullability() {
        let schema = long_schema("Value");
        assert!(!schema.field(4).is_nullable());
        assert!(schema.field(5).is_nullable());
        assert_eq!(schema.field(5).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_read_rejects_non_parquet() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bogus.parquet");
        fs::write(&path, b"not parquet")?;
        assert!(read_long_parquet(&path).is_err());
        Ok(())
    }
}
