// src/views/mod.rs
//
// Derived views over an immutable `LongTable`. Every function returns a fresh
// value; none of them mutate the table they read.

pub mod distribution;
pub mod growth;
pub mod latest;
pub mod series;

pub use distribution::{latest_distribution, Distribution};
pub use growth::{annotate_growth, growth_by_entity, growth_rate, growth_view, GrowthPoint};
pub use latest::{latest_of, latest_per_entity};
pub use series::{by_entity, entity_series};
