use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{PfamId, Repository};
use crate::error::KiraError;

pub const CONFIG_FILE: &str = "kira-kb.json";
pub const DEFAULT_PFAM: &str = "PF00067";
pub const DEFAULT_BATCH_SIZE: usize = 20;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub pfams: Option<Vec<String>>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Endpoints {
    #[serde(default)]
    pub uniprot: Option<String>,
    #[serde(default)]
    pub rhea: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub pfams: Vec<PfamId>,
    pub batch_size: usize,
    pub output_dir: Utf8PathBuf,
    pub timeout: Option<Duration>,
    pub uniprot_endpoint: String,
    pub rhea_endpoint: String,
}

impl ResolvedConfig {
    pub fn endpoint(&self, repository: Repository) -> &str {
        match repository {
            Repository::Uniprot => &self.uniprot_endpoint,
            Repository::Rhea => &self.rhea_endpoint,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `kira-kb.json` from the working directory when no
    /// path is given. A missing implicit file means defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, KiraError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| KiraError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KiraError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, KiraError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let pfams = config
            .pfams
            .unwrap_or_else(|| vec![DEFAULT_PFAM.to_string()])
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<PfamId>, KiraError>>()?;

        let batch_size = config.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size < 1 {
            return Err(KiraError::InvalidBatchSize(batch_size));
        }

        Ok(ResolvedConfig {
            schema_version,
            pfams,
            batch_size,
            output_dir: Utf8PathBuf::from(config.output_dir.unwrap_or_else(|| ".".to_string())),
            timeout: config.timeout_secs.map(Duration::from_secs),
            uniprot_endpoint: config
                .endpoints
                .uniprot
                .unwrap_or_else(|| Repository::Uniprot.default_endpoint().to_string()),
            rhea_endpoint: config
                .endpoints
                .rhea
                .unwrap_or_else(|| Repository::Rhea.default_endpoint().to_string()),
        })
    }
}
