// src/pipeline.rs
use anyhow::Result;
use std::{io::Write, time::Instant};
use tracing::{info, instrument};

use crate::config::RunConfig;
use crate::export::{write_long_csv, write_long_parquet};
use crate::report::write_report;
use crate::table::{load_wide_csv, melt, ReshapeResult};

/// Load, reshape, report to `out`, then write any configured exports.
#[instrument(level = "info", skip(cfg, out), fields(input = %cfg.input.display()))]
pub fn run<W: Write>(cfg: &RunConfig, out: &mut W) -> Result<ReshapeResult> {
    let start = Instant::now();

    let wide = load_wide_csv(&cfg.input, &cfg.load_options()?)?;
    let reshaped = melt(&wide);

    write_report(out, cfg, &wide, &reshaped)?;
    out.flush()?;

    if let Some(path) = &cfg.export_csv {
        write_long_csv(&reshaped.long, path, &cfg.value_label)?;
    }
    if let Some(path) = &cfg.export_parquet {
        write_long_parquet(&reshaped.long, path, &cfg.value_label)?;
    }

    info!(elapsed = ?start.elapsed(), "run complete");
    Ok(reshaped)
}
