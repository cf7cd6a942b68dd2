use crate::core::io::export::{DEFAULT_SHORTLIST_REGIONS, DEFAULT_TOP_N, ShortlistExporter};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SHORTLIST_FILE: &str = "top_100_seqs.csv";
const JSON_EXTENSION: &str = "json";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub shortlist_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortlistConfig {
    pub top_n: usize,
    pub regions: usize,
}

impl ShortlistConfig {
    pub fn exporter(&self) -> ShortlistExporter {
        ShortlistExporter {
            top_n: self.top_n,
            regions: self.regions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub input_path: PathBuf,
    pub output: OutputConfig,
    pub shortlist: ShortlistConfig,
}

/// The JSON aggregate lives next to the input, with the extension replaced.
pub fn default_json_path(input_path: &Path) -> PathBuf {
    input_path.with_extension(JSON_EXTENSION)
}

#[derive(Default)]
pub struct HarvestConfigBuilder {
    input_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
    shortlist_path: Option<PathBuf>,
    top_n: Option<usize>,
    shortlist_regions: Option<usize>,
}

impl HarvestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_path(mut self, path: PathBuf) -> Self {
        self.input_path = Some(path);
        self
    }
    pub fn json_path(mut self, path: PathBuf) -> Self {
        self.json_path = Some(path);
        self
    }
    pub fn shortlist_path(mut self, path: PathBuf) -> Self {
        self.shortlist_path = Some(path);
        self
    }
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
    pub fn shortlist_regions(mut self, regions: usize) -> Self {
        self.shortlist_regions = Some(regions);
        self
    }

    pub fn build(self) -> Result<HarvestConfig, ConfigError> {
        let input_path = self
            .input_path
            .ok_or(ConfigError::MissingParameter("input_path"))?;
        let json_path = self
            .json_path
            .unwrap_or_else(|| default_json_path(&input_path));
        if json_path == input_path {
            return Err(ConfigError::InvalidParameter {
                name: "json_path",
                reason: format!(
                    "'{}' would overwrite the input file",
                    json_path.display()
                ),
            });
        }
        let shortlist_path = self
            .shortlist_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHORTLIST_FILE));
        if shortlist_path == input_path {
            return Err(ConfigError::InvalidParameter {
                name: "shortlist_path",
                reason: format!(
                    "'{}' would overwrite the input file",
                    shortlist_path.display()
                ),
            });
        }

        let top_n = self.top_n.unwrap_or(DEFAULT_TOP_N);
        if top_n == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "top_n",
                reason: "must be at least 1".to_string(),
            });
        }
        let regions = self.shortlist_regions.unwrap_or(DEFAULT_SHORTLIST_REGIONS);
        if regions == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "shortlist_regions",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(HarvestConfig {
            input_path,
            output: OutputConfig {
                json_path,
                shortlist_path,
            },
            shortlist: ShortlistConfig { top_n, regions },
        })
    }
}
