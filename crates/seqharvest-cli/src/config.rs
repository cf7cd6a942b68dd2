use crate::cli::Cli;
use crate::error::{CliError, Result};
use seqharvest::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    #[serde(rename = "json-path")]
    json_path: Option<PathBuf>,
    #[serde(rename = "shortlist-path")]
    shortlist_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialShortlistConfig {
    #[serde(rename = "top-n")]
    top_n: Option<usize>,
    regions: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialHarvestConfig {
    output: Option<PartialOutputConfig>,
    shortlist: Option<PartialShortlistConfig>,
}

impl PartialHarvestConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &Cli) -> Result<core_config::HarvestConfig> {
        self.apply_set_values(&args.set_values)?;

        let output = self.output.take().unwrap_or_default();
        let shortlist = self.shortlist.take().unwrap_or_default();

        let mut builder =
            core_config::HarvestConfigBuilder::new().input_path(args.input.clone());

        if let Some(path) = args.json_path.clone().or(output.json_path) {
            builder = builder.json_path(path);
        }
        if let Some(path) = args.shortlist_path.clone().or(output.shortlist_path) {
            builder = builder.shortlist_path(path);
        }
        if let Some(n) = args.top_n.or(shortlist.top_n) {
            builder = builder.top_n(n);
        }
        if let Some(regions) = args.regions.or(shortlist.regions) {
            builder = builder.shortlist_regions(regions);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "output.json-path" => {
                    self.output.get_or_insert_with(Default::default).json_path =
                        Some(PathBuf::from(value_str));
                }
                "output.shortlist-path" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .shortlist_path = Some(PathBuf::from(value_str));
                }
                "shortlist.top-n" => {
                    self.shortlist.get_or_insert_with(Default::default).top_n =
                        Some(parse_integer(key, value_str)?);
                }
                "shortlist.regions" => {
                    self.shortlist.get_or_insert_with(Default::default).regions =
                        Some(parse_integer(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_integer(key: &str, value_str: &str) -> Result<usize> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid integer value for {}: {}",
            key, value_str
        ))
    })
}
