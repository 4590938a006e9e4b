use crate::table::LongTable;

/// Values of every entity in one year.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution {
    pub year: Option<i32>,
    pub values: Vec<f64>,
}

/// Cross-section at the latest year of the whole table.
///
/// The year is picked before missing values are dropped, so a final year that
/// is entirely blank yields an empty distribution for that year rather than
/// falling back to an earlier one.
pub fn latest_distribution(long: &LongTable) -> Distribution {
    let Some(year) = long.max_year() else {
        return Distribution::default();
    };
    let values = long
        .records()
        .iter()
        .filter(|r| r.year == year)
        .filter_map(|r| r.value)
        .collect();
    Distribution {
        year: Some(year),
        values,
    }
}
