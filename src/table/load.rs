// src/table/load.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    sync::Arc,
};
use tracing::{debug, info, warn};

use super::{Entity, WideRow, WideTable, ID_FIELDS};

/// Cell texts read as missing values, besides the empty cell.
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", ".."];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    /// Lines dropped before the header row (World Bank downloads carry a 4-line preamble).
    pub skip_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_rows: 0,
        }
    }
}

enum Cell {
    Value(f64),
    Missing,
    Unparseable,
}

fn parse_cell(raw: &str) -> Cell {
    let v = raw.trim();
    if v.is_empty() || MISSING_MARKERS.contains(&v) {
        return Cell::Missing;
    }
    match v.parse::<f64>() {
        Ok(x) if x.is_finite() => Cell::Value(x),
        _ => Cell::Unparseable,
    }
}

/// Open `path` and read it as a wide table. The file handle is released on return.
#[tracing::instrument(level = "info", skip(path, opts), fields(path = %path.as_ref().display()))]
pub fn load_wide_csv<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<WideTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let wide = read_wide(file, opts)
        .with_context(|| format!("Failed to read wide table from {}", path.display()))?;
    info!(
        rows = wide.rows.len(),
        value_columns = wide.value_columns.len(),
        "loaded wide table"
    );
    Ok(wide)
}

/// Parse a delimited wide table with a header row.
///
/// - `skip_rows` preamble lines are discarded first
/// - the header must contain every field of [`ID_FIELDS`]; the rest are value columns
/// - short rows are padded with missing cells, cells beyond the header are ignored
pub fn read_wide<R: Read>(reader: R, opts: &LoadOptions) -> Result<WideTable> {
    let mut reader = BufReader::new(reader);

    let mut line = String::new();
    for skipped in 0..opts.skip_rows {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .with_context(|| format!("Failed to read preamble line {}", skipped + 1))?;
        if n == 0 {
            bail!(
                "input ended after {} preamble lines, before the header row",
                skipped
            );
        }
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut id_positions = [0usize; 4];
    for (slot, field) in id_positions.iter_mut().zip(ID_FIELDS) {
        *slot = match headers.iter().position(|h| h == field) {
            Some(pos) => pos,
            None => bail!("header is missing identifier field `{}`", field),
        };
    }

    let value_positions: Vec<usize> = (0..headers.len())
        .filter(|i| !id_positions.contains(i))
        .collect();
    let value_columns: Vec<String> = value_positions.iter().map(|&i| headers[i].clone()).collect();
    debug!(?value_columns, "value columns");

    let mut unparseable = vec![0usize; value_positions.len()];
    let mut rows = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error at data record {}", idx + 1))?;
        let field = |pos: usize| record.get(pos).unwrap_or("").to_string();

        let entity = Entity {
            name: field(id_positions[0]),
            code: field(id_positions[1]),
            indicator_name: field(id_positions[2]),
            indicator_code: field(id_positions[3]),
        };

        let mut values = Vec::with_capacity(value_positions.len());
        for (col, &pos) in value_positions.iter().enumerate() {
            values.push(match parse_cell(record.get(pos).unwrap_or("")) {
                Cell::Value(x) => Some(x),
                Cell::Missing => None,
                Cell::Unparseable => {
                    unparseable[col] += 1;
                    None
                }
            });
        }

        rows.push(WideRow {
            entity: Arc::new(entity),
            values,
        });
    }

    for (label, count) in value_columns.iter().zip(&unparseable) {
        if *count > 0 {
            warn!(column = %label, cells = count, "non-numeric cells read as missing");
        }
    }

    Ok(WideTable {
        headers,
        value_columns,
        rows,
    })
}
