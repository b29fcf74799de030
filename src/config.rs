use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::fetch::DEFAULT_INDEX_URL;
use crate::region::Region;

/// On-disk pipeline configuration, `nehoda.json` in the working directory.
/// Every field is optional; omitted fields fall back to the defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub index_url: Option<String>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub index_url: String,
    pub data_dir: Utf8PathBuf,
    /// Default region selection for merge requests; `None` means all known
    /// regions.
    pub regions: Option<Vec<Region>>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads and resolves the config file. With `path == None` a missing
    /// `nehoda.json` is not an error; the defaults apply.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DataError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("nehoda.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| DataError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DataError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, DataError> {
        let index_url = config
            .index_url
            .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
        let data_dir = Utf8PathBuf::from(config.data_dir.unwrap_or_else(|| "data".to_string()));

        let regions = if config.regions.is_empty() {
            None
        } else {
            Some(
                config
                    .regions
                    .iter()
                    .map(|value| value.parse())
                    .collect::<Result<Vec<Region>, DataError>>()?,
            )
        };

        Ok(ResolvedConfig {
            index_url,
            data_dir,
            regions,
        })
    }
}
