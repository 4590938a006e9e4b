// src/report.rs
//
// Console report: table shapes, previews, statistics and the series behind
// each chart. Charts themselves are not drawn.

use anyhow::Result;
use prettytable::{format, Cell, Row, Table};
use std::io::Write;

use crate::config::RunConfig;
use crate::stats::{box_summary, describe, histogram, Describe};
use crate::table::{LongRecord, ReshapeResult, WideTable};
use crate::views::{
    by_entity, entity_series, growth_by_entity, growth_view, latest_distribution,
    latest_per_entity,
};

fn fmt_value(v: f64) -> String {
    format!("{:.2}", v)
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_value).unwrap_or_else(|| "-".to_string())
}

fn new_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        titles.iter().map(|t| Cell::new(t).style_spec("bFg")).collect(),
    ));
    table
}

fn records_table(records: &[LongRecord], value_label: &str) -> Table {
    let mut table = new_table(&["Country Name", "Country Code", "Year", value_label]);
    for r in records {
        table.add_row(Row::new(vec![
            Cell::new(r.name()),
            Cell::new(&r.entity.code),
            Cell::new(&r.year.to_string()).style_spec("r"),
            Cell::new(&fmt_opt(r.value)).style_spec("r"),
        ]));
    }
    table
}

fn describe_table(d: &Describe) -> Table {
    let mut table = new_table(&["Statistic", "Value"]);
    table.add_row(Row::new(vec![
        Cell::new("count"),
        Cell::new(&d.count.to_string()).style_spec("r"),
    ]));
    let rows = [
        ("mean", d.mean),
        ("std", d.std),
        ("min", d.min),
        ("25%", d.q25),
        ("50%", d.median),
        ("75%", d.q75),
        ("max", d.max),
    ];
    for (name, v) in rows {
        table.add_row(Row::new(vec![
            Cell::new(name),
            Cell::new(&fmt_opt(v)).style_spec("r"),
        ]));
    }
    table
}

/// Write the full report for one run to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    cfg: &RunConfig,
    wide: &WideTable,
    reshaped: &ReshapeResult,
) -> Result<()> {
    let long = &reshaped.long;
    let label = cfg.value_label.as_str();

    // ─── shapes & previews ───────────────────────────────────────────
    let (wr, wc) = wide.shape();
    let (lr, lc) = long.shape();
    writeln!(out, "Original wide table shape: ({}, {})", wr, wc)?;
    writeln!(out, "Converted long table shape: ({}, {})", lr, lc)?;
    if !reshaped.dropped_columns.is_empty() {
        writeln!(
            out,
            "Dropped {} non-year column(s): {:?}",
            reshaped.dropped_columns.len(),
            reshaped.dropped_columns
        )?;
    }

    writeln!(out, "\nFirst {} rows of the long table:", cfg.preview_rows)?;
    records_table(long.head(cfg.preview_rows), label).print(out)?;
    writeln!(out, "\nLast {} rows of the long table:", cfg.preview_rows)?;
    records_table(long.tail(cfg.preview_rows), label).print(out)?;

    // ─── statistics ──────────────────────────────────────────────────
    writeln!(out, "\nDescriptive statistics for {}:", label)?;
    describe_table(&describe(&long.values())).print(out)?;
    writeln!(out, "\nNumber of missing {} values: {}", label, long.missing_count())?;

    // ─── 1) single-entity trend ──────────────────────────────────────
    writeln!(out, "\n--- {} trend for {} ---", label, cfg.single_entity)?;
    let single = entity_series(long, std::slice::from_ref(&cfg.single_entity));
    if single.is_empty() {
        writeln!(out, "no data for {}", cfg.single_entity)?;
    } else {
        let mut table = new_table(&["Year", label]);
        for r in &single {
            table.add_row(Row::new(vec![
                Cell::new(&r.year.to_string()),
                Cell::new(&fmt_opt(r.value)).style_spec("r"),
            ]));
        }
        table.print(out)?;
    }

    // ─── 2) multi-entity comparison ──────────────────────────────────
    let compare = &cfg.compare_entities;
    writeln!(out, "\n--- {} comparison for selected entities ---", label)?;
    let series = entity_series(long, compare);
    for name in compare {
        let points = by_entity(&series, name);
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => writeln!(
                out,
                "{}: {} points, {}-{}",
                name,
                points.len(),
                first.year,
                last.year
            )?,
            _ => writeln!(out, "{}: no data", name)?,
        }
    }
    if !series.is_empty() {
        records_table(&series, label).print(out)?;
    }

    // ─── 3) latest available year, largest first ─────────────────────
    writeln!(out, "\n--- {} for selected entities (latest available year) ---", label)?;
    let latest = latest_per_entity(long, compare);
    if latest.is_empty() {
        writeln!(out, "no data")?;
    } else {
        records_table(&latest, label).print(out)?;
    }

    // ─── 4) year-over-year growth ────────────────────────────────────
    writeln!(out, "\n--- Annual growth rate (%) for selected entities ---")?;
    let growth = growth_view(&series);
    if growth.is_empty() {
        writeln!(out, "no data")?;
    } else {
        let mut table = new_table(&["Country Name", "Year", "Growth (%)"]);
        for p in &growth {
            table.add_row(Row::new(vec![
                Cell::new(p.name()),
                Cell::new(&p.year.to_string()).style_spec("r"),
                Cell::new(&fmt_opt(p.growth)).style_spec("r"),
            ]));
        }
        table.print(out)?;
    }

    // ─── 5) cross-section at the latest year ─────────────────────────
    let dist = latest_distribution(long);
    match dist.year {
        Some(year) => writeln!(out, "\n--- Distribution of {} across entities in {} ---", label, year)?,
        None => writeln!(out, "\n--- Distribution of {} across entities ---", label)?,
    }
    match histogram(&dist.values, cfg.histogram_bins) {
        Some(hist) => {
            let mut table = new_table(&["From", "To", "Entities"]);
            for (lo, hi, count) in hist.bins() {
                table.add_row(Row::new(vec![
                    Cell::new(&fmt_value(lo)).style_spec("r"),
                    Cell::new(&fmt_value(hi)).style_spec("r"),
                    Cell::new(&count.to_string()).style_spec("r"),
                ]));
            }
            table.print(out)?;
        }
        None => writeln!(out, "no data")?,
    }

    // ─── 6) growth-rate spread per entity ────────────────────────────
    writeln!(out, "\n--- Distribution of annual growth rates (%) per entity ---")?;
    let mut table = new_table(&[
        "Country Name",
        "n",
        "Low whisker",
        "Q1",
        "Median",
        "Q3",
        "High whisker",
    ]);
    for (name, rates) in growth_by_entity(&growth, compare) {
        let b = box_summary(&rates);
        table.add_row(Row::new(vec![
            Cell::new(&name),
            Cell::new(&rates.len().to_string()).style_spec("r"),
            Cell::new(&fmt_opt(b.as_ref().map(|b| b.whisker_low))).style_spec("r"),
            Cell::new(&fmt_opt(b.as_ref().map(|b| b.q1))).style_spec("r"),
            Cell::new(&fmt_opt(b.as_ref().map(|b| b.median))).style_spec("r"),
            Cell::new(&fmt_opt(b.as_ref().map(|b| b.q3))).style_spec("r"),
            Cell::new(&fmt_opt(b.as_ref().map(|b| b.whisker_high))).style_spec("r"),
        ]));
    }
    table.print(out)?;

    Ok(())
}
