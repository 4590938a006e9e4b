use std::sync::Arc;

use crate::table::{Entity, LongRecord};

/// An observation annotated with its year-over-year change in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPoint {
    pub entity: Arc<Entity>,
    pub year: i32,
    pub value: Option<f64>,
    pub growth: Option<f64>,
}

impl GrowthPoint {
    pub fn name(&self) -> &str {
        &self.entity.name
    }
}

/// `(current - previous) / previous * 100`, undefined when either side is
/// missing or `previous` is zero.
pub fn growth_rate(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (p, c) = (previous?, current?);
    if p == 0.0 {
        return None;
    }
    let g = (c - p) / p * 100.0;
    g.is_finite().then_some(g)
}

/// Growth of every record against the previous year of the same entity.
///
/// Records are ordered by (name, year) first (stable). The first observation
/// of each entity has no growth; neither does one whose own value or
/// predecessor value is missing.
pub fn annotate_growth(records: &[LongRecord]) -> Vec<GrowthPoint> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.name().cmp(b.name()).then(a.year.cmp(&b.year)));

    let mut out = Vec::with_capacity(sorted.len());
    for group in sorted.chunk_by(|a, b| a.name() == b.name()) {
        let mut previous: Option<f64> = None;
        for (i, rec) in group.iter().enumerate() {
            let growth = if i == 0 {
                None
            } else {
                growth_rate(previous, rec.value)
            };
            out.push(GrowthPoint {
                entity: Arc::clone(&rec.entity),
                year: rec.year,
                value: rec.value,
                growth,
            });
            previous = rec.value;
        }
    }
    out
}

/// Only the points that have a defined growth rate.
pub fn growth_view(records: &[LongRecord]) -> Vec<GrowthPoint> {
    annotate_growth(records)
        .into_iter()
        .filter(|p| p.growth.is_some())
        .collect()
}

/// Growth rates per requested name, in the order of `names`. Names without
/// any rate get an empty list.
pub fn growth_by_entity<S: AsRef<str>>(
    points: &[GrowthPoint],
    names: &[S],
) -> Vec<(String, Vec<f64>)> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let rates: Vec<f64> = points
                .iter()
                .filter(|p| p.name() == name)
                .filter_map(|p| p.growth)
                .collect();
            (name.to_string(), rates)
        })
        .collect()
}
