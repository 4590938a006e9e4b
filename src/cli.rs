//! Command-line arguments of the `gdpmelt` binary.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::RunConfig;

/// Reshape a wide World Bank indicator table to long format and summarise it
#[derive(Parser, Debug)]
#[command(name = "gdpmelt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wide-format input file [default: data.csv]
    pub input: Option<PathBuf>,

    /// YAML run configuration; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Entity for the single-series trend
    #[arg(long)]
    pub country: Option<String>,

    /// Entities to compare (repeatable)
    #[arg(long = "compare")]
    pub compare: Vec<String>,

    /// Histogram bucket count
    #[arg(long)]
    pub bins: Option<usize>,

    /// Lines to skip before the header row
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Field delimiter of the input file
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Write the long table as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Write the long table as Parquet
    #[arg(long)]
    pub export_parquet: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn resolve(self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(input) = self.input {
            cfg.input = input;
        }
        if let Some(country) = self.country {
            cfg.single_entity = country;
        }
        if !self.compare.is_empty() {
            cfg.compare_entities = self.compare;
        }
        if let Some(bins) = self.bins {
            cfg.histogram_bins = bins;
        }
        if let Some(skip) = self.skip_rows {
            cfg.skip_rows = skip;
        }
        if let Some(d) = self.delimiter {
            cfg.delimiter = d;
        }
        if self.export_csv.is_some() {
            cfg.export_csv = self.export_csv;
        }
        if self.export_parquet.is_some() {
            cfg.export_parquet = self.export_parquet;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
