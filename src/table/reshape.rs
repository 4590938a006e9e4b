// src/table/reshape.rs
use std::sync::Arc;
use tracing::{info, warn};

use super::{LongRecord, LongTable, WideTable};

#[derive(Debug, Clone)]
pub struct ReshapeResult {
    pub long: LongTable,
    /// Value columns whose label parsed as a year.
    pub year_columns: usize,
    /// Labels of the value columns discarded because they are not years.
    pub dropped_columns: Vec<String>,
}

/// Parse a column label as a year.
///
/// Accepts plain integers and integral float text ("2018.0"); anything else,
/// including an empty label, is not a year.
pub fn parse_year(label: &str) -> Option<i32> {
    let t = label.trim();
    if let Ok(y) = t.parse::<i32>() {
        return Some(y);
    }
    match t.parse::<f64>() {
        Ok(f)
            if f.is_finite()
                && f.fract() == 0.0
                && f >= i32::MIN as f64
                && f <= i32::MAX as f64 =>
        {
            Some(f as i32)
        }
        _ => None,
    }
}

/// Unpivot `wide` into one record per (row, year column).
///
/// Records come out row-major: wide rows in file order, then value columns in
/// header order. Columns whose label is not a year are dropped with a warning.
/// Repeated entity rows are kept as-is, so (entity, year) pairs may repeat.
#[tracing::instrument(
    level = "info",
    skip(wide),
    fields(rows = wide.rows.len(), columns = wide.value_columns.len())
)]
pub fn melt(wide: &WideTable) -> ReshapeResult {
    let years: Vec<Option<i32>> = wide.value_columns.iter().map(|l| parse_year(l)).collect();

    let mut dropped_columns = Vec::new();
    for (label, year) in wide.value_columns.iter().zip(&years) {
        if year.is_none() {
            warn!(
                column = %label,
                records = wide.rows.len(),
                "dropping value column: label is not a year"
            );
            dropped_columns.push(label.clone());
        }
    }

    let year_columns = years.iter().flatten().count();
    let mut records = Vec::with_capacity(wide.rows.len() * year_columns);
    for row in &wide.rows {
        for (year, value) in years.iter().zip(&row.values) {
            if let Some(year) = year {
                records.push(LongRecord {
                    entity: Arc::clone(&row.entity),
                    year: *year,
                    value: *value,
                });
            }
        }
    }

    info!(
        long_rows = records.len(),
        year_columns,
        dropped = dropped_columns.len(),
        "reshaped wide table to long"
    );

    ReshapeResult {
        long: LongTable::new(records),
        year_columns,
        dropped_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{read_wide, LoadOptions};

    fn wide(text: &str) -> WideTable {
        read_wide(text.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2018"), Some(2018));
        assert_eq!(parse_year(" 1960 "), Some(1960));
        assert_eq!(parse_year("2018.0"), Some(2018));
        assert_eq!(parse_year("2018.5"), None);
        assert_eq!(parse_year("notayear"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("Unnamed: 69"), None);
        assert_eq!(parse_year("inf"), None);
        assert_eq!(parse_year("NaN"), None);
    }

    #[test]
    fn test_row_count_and_dropped_columns() {
        let w = wide(
            "Country Name,Country Code,Indicator Name,Indicator Code,2018,2019,notayear\n\
             A,AAA,GDP,X,10,20,1\n\
             B,BBB,GDP,X,,5,2\n",
        );
        let out = melt(&w);
        assert_eq!(out.year_columns, 2);
        assert_eq!(out.dropped_columns, vec!["notayear"]);
        assert_eq!(out.long.len(), w.rows.len() * out.year_columns);
        assert!(out.long.records().iter().all(|r| r.year == 2018 || r.year == 2019));
    }

    #[test]
    fn test_row_major_order_keeps_column_order() {
        let w = wide(
            "Country Name,Country Code,Indicator Name,Indicator Code,2020,1990,2005\n\
             A,AAA,GDP,X,1,2,3\n\
             B,BBB,GDP,X,4,5,6\n",
        );
        let out = melt(&w);
        let got: Vec<(&str, i32, Option<f64>)> = out
            .long
            .records()
            .iter()
            .map(|r| (r.name(), r.year, r.value))
            .collect();
        assert_eq!(
            got,
            vec![
                ("A", 2020, Some(1.0)),
                ("A", 1990, Some(2.0)),
                ("A", 2005, Some(3.0)),
                ("B", 2020, Some(4.0)),
                ("B", 1990, Some(5.0)),
                ("B", 2005, Some(6.0)),
            ]
        );
    }

    #[test]
    fn test_round_trip_against_wide() {
        let w = wide(
            "Country Name,Country Code,Indicator Name,Indicator Code,2017,bad,2018,2019\n\
             A,AAA,GDP,X,1.5,9,,3\n\
             B,BBB,GDP,X,,9,7,8.25\n\
             C,CCC,GDP,X,0,9,0,\n",
        );
        let out = melt(&w);
        let mut checked = 0;
        for rec in out.long.records() {
            let row = w
                .rows
                .iter()
                .position(|r| Arc::ptr_eq(&r.entity, &rec.entity))
                .expect("record must share its wide row's entity");
            if let Some(v) = rec.value {
                assert_eq!(w.value_at(row, &rec.year.to_string()), Some(v));
                checked += 1;
            }
        }
        assert_eq!(checked, 6);
    }

    #[test]
    fn test_duplicate_entity_rows_are_kept() {
        let w = wide(
            "Country Name,Country Code,Indicator Name,Indicator Code,2019\n\
             A,AAA,GDP,X,1\n\
             A,AAA,GDP,X,2\n",
        );
        let out = melt(&w);
        assert_eq!(out.long.len(), 2);
        assert_eq!(out.long.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_no_year_columns_gives_empty_table() {
        let w = wide(
            "Country Name,Country Code,Indicator Name,Indicator Code,foo\n\
             A,AAA,GDP,X,1\n",
        );
        let out = melt(&w);
        assert!(out.long.is_empty());
        assert_eq!(out.year_columns, 0);
        assert_eq!(out.dropped_columns, vec!["foo"]);
    }
}
