// src/config.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::table::LoadOptions;

/// Bucket count of the cross-sectional histogram.
pub const HISTOGRAM_BINS: usize = 30;
/// Rows shown by the head/tail previews.
pub const PREVIEW_ROWS: usize = 5;

/// Everything one run needs. Keys missing from a YAML file take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input: PathBuf,
    pub delimiter: char,
    pub skip_rows: usize,
    /// Header of the value column in exports and reports.
    pub value_label: String,
    pub single_entity: String,
    pub compare_entities: Vec<String>,
    pub histogram_bins: usize,
    pub preview_rows: usize,
    pub export_csv: Option<PathBuf>,
    pub export_parquet: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            delimiter: ',',
            skip_rows: 0,
            value_label: "GDP (current US$)".into(),
            single_entity: "United States".into(),
            compare_entities: ["United States", "China", "Germany", "Japan", "India"]
                .into_iter()
                .map(String::from)
                .collect(),
            histogram_bins: HISTOGRAM_BINS,
            preview_rows: PREVIEW_ROWS,
            export_csv: None,
            export_parquet: None,
        }
    }
}

impl RunConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: RunConfig = serde_yaml::from_str(text).context("parsing YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if self.compare_entities.is_empty() {
            bail!("compare_entities must name at least one entity");
        }
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            delimiter: self.delimiter_byte()?,
            skip_rows: self.skip_rows,
        })
    }

    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow!("delimiter {:?} is not a single ASCII character", self.delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() -> Result<()> {
        let cfg = RunConfig::default();
        assert_eq!(cfg.input, PathBuf::from("data.csv"));
        assert_eq!(cfg.histogram_bins, 30);
        assert_eq!(cfg.compare_entities.len(), 5);
        assert_eq!(cfg.load_options()?, LoadOptions::default());
        Ok(())
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "input: wdi/gdp.csv")?;
        writeln!(tmp, "skip_rows: 4")?;
        writeln!(tmp, "delimiter: \";\"")?;
        writeln!(tmp, "compare_entities: [France, Italy]")?;

        let cfg = RunConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.input, PathBuf::from("wdi/gdp.csv"));
        assert_eq!(cfg.compare_entities, vec!["France", "Italy"]);
        assert_eq!(cfg.single_entity, "United States");
        assert_eq!(
            cfg.load_options()?,
            LoadOptions {
                delimiter: b';',
                skip_rows: 4
            }
        );
        Ok(())
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(RunConfig::from_yaml_str("histogram_bins: 0").is_err());
        assert!(RunConfig::from_yaml_str("compare_entities: []").is_err());
        assert!(RunConfig::from_yaml_str("delimiter: \"§\"").is_err());
        assert!(RunConfig::from_yaml_str("colour: blue").is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(RunConfig::from_yaml_file("nope/config.yaml").is_err());
    }
}
