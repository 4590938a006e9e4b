use std::{cmp::Ordering, collections::HashMap};

use super::series::entity_series;
use crate::table::{LongRecord, LongTable};

/// Latest observation with a value for each named entity, largest value first.
///
/// Missing values are dropped before the latest year is picked, so an entity
/// whose newest year is blank reports its newest year that has a value.
pub fn latest_per_entity<S: AsRef<str>>(long: &LongTable, names: &[S]) -> Vec<LongRecord> {
    latest_of(&entity_series(long, names))
}

/// One record per entity: the one with the greatest year.
///
/// When several records share an entity's greatest year, the first one in
/// `records` wins. Output is sorted by value descending (missing last); the sort
/// is stable so equal values keep first-seen entity order.
pub fn latest_of(records: &[LongRecord]) -> Vec<LongRecord> {
    let mut best: Vec<LongRecord> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for rec in records {
        match slot.get(rec.name()) {
            Some(&i) => {
                if rec.year > best[i].year {
                    best[i] = rec.clone();
                }
            }
            None => {
                slot.insert(rec.name(), best.len());
                best.push(rec.clone());
            }
        }
    }

    best.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    best
}
