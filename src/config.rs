//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Affiliation classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum identifiers requested per run
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    100
}

/// Classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Company keywords, matched case-insensitively against affiliation text
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
        }
    }
}

fn default_keywords() -> Vec<String> {
    classify::DEFAULT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

/// Load configuration from a file, with `GET_PAPERS`-prefixed environment
/// variables taking precedence over file values.
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("GET_PAPERS").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the working directory.
pub fn find_config_file() -> Option<PathBuf> {
    let candidate = PathBuf::from("get-papers.toml");
    candidate.is_file().then_some(candidate)
}
