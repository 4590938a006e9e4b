use std::collections::HashSet;

use crate::table::{LongRecord, LongTable};

/// Records of the named entities that carry a value, sorted by (name, year).
///
/// The sort is stable, so duplicate (name, year) records keep table order.
/// Names absent from the table simply contribute nothing.
pub fn entity_series<S: AsRef<str>>(long: &LongTable, names: &[S]) -> Vec<LongRecord> {
    let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
    let mut out: Vec<LongRecord> = long
        .records()
        .iter()
        .filter(|r| r.value.is_some() && wanted.contains(r.name()))
        .cloned()
        .collect();
    out.sort_by(|a, b| a.name().cmp(b.name()).then(a.year.cmp(&b.year)));
    out
}

/// Slice of `series` belonging to `name`. Expects the (name, year) order of [`entity_series`].
pub fn by_entity<'a>(series: &'a [LongRecord], name: &str) -> &'a [LongRecord] {
    let start = series.partition_point(|r| r.name() < name);
    let end = start + series[start..].partition_point(|r| r.name() == name);
    &series[start..end]
}
