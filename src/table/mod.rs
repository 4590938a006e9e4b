// src/table/mod.rs

pub mod load;
pub mod reshape;

pub use load::{load_wide_csv, read_wide, LoadOptions};
pub use reshape::{melt, parse_year, ReshapeResult};

use std::sync::Arc;

/// Header fields that identify an entity. Every other header column is a value column.
pub const ID_FIELDS: [&str; 4] = [
    "Country Name",
    "Country Code",
    "Indicator Name",
    "Indicator Code",
];

/// Column count of the long table: the four identifier fields, Year and Value.
pub const LONG_COLUMNS: usize = 6;

/// One country/region and the indicator measured for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub name: String,
    pub code: String,
    pub indicator_name: String,
    pub indicator_code: String,
}

/// One wide row: an entity plus one cell per value column, in header order.
#[derive(Debug, Clone)]
pub struct WideRow {
    pub entity: Arc<Entity>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct WideTable {
    /// Every header column, identifier fields included, as read from the file.
    pub headers: Vec<String>,
    /// Header labels of the value columns, in file order.
    pub value_columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// `(rows, columns)` counting every header column.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    /// Cell of `row` under the first value column labelled `label`.
    pub fn value_at(&self, row: usize, label: &str) -> Option<f64> {
        let col = self.value_columns.iter().position(|c| c == label)?;
        self.rows.get(row)?.values.get(col).copied().flatten()
    }
}

/// One (entity, year) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    /// Shared with the wide row this record was produced from.
    pub entity: Arc<Entity>,
    pub year: i32,
    pub value: Option<f64>,
}

impl LongRecord {
    pub fn name(&self) -> &str {
        &self.entity.name
    }
}

/// The tidy table. Immutable once built; views borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    records: Vec<LongRecord>,
}

impl LongTable {
    pub fn new(records: Vec<LongRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), LONG_COLUMNS)
    }

    pub fn head(&self, n: usize) -> &[LongRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn tail(&self, n: usize) -> &[LongRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    /// Non-missing values in table order.
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.value).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.records.iter().filter(|r| r.value.is_none()).count()
    }

    /// Latest year over every record, whether or not it carries a value.
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

/// Parse CSV text with default options and reshape it.
#[cfg(test)]
pub(crate) fn long_from_csv(text: &str) -> LongTable {
    let wide = read_wide(text.as_bytes(), &LoadOptions::default()).expect("fixture must parse");
    melt(&wide).long
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Country Name,Country Code,Indicator Name,Indicator Code,2018,2019
A,AAA,GDP,NY.GDP,10,
B,BBB,GDP,NY.GDP,,5
";

    #[test]
    fn test_long_table_accessors() {
        let long = long_from_csv(CSV);
        assert_eq!(long.shape(), (4, LONG_COLUMNS));
        assert_eq!(long.missing_count(), 2);
        assert_eq!(long.values(), vec![10.0, 5.0]);
        assert_eq!(long.max_year(), Some(2019));
        assert_eq!(long.head(10).len(), 4);
        assert_eq!(long.tail(1)[0].name(), "B");
        assert_eq!(long.tail(1)[0].year, 2019);
    }

    #[test]
    fn test_empty_long_table() {
        let long = LongTable::default();
        assert!(long.is_empty());
        assert_eq!(long.max_year(), None);
        assert!(long.head(5).is_empty());
        assert!(long.tail(5).is_empty());
    }

    #[test]
    fn test_wide_value_at() {
        let wide = read_wide(CSV.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(wide.shape(), (2, 6));
        assert_eq!(wide.value_at(0, "2018"), Some(10.0));
        assert_eq!(wide.value_at(0, "2019"), None);
        assert_eq!(wide.value_at(1, "2019"), Some(5.0));
        assert_eq!(wide.value_at(1, "1999"), None);
        assert_eq!(wide.value_at(7, "2018"), None);
    }
}
