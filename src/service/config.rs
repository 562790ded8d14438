use crate::engine::converter::CurrencyConverter;
use crate::graph::path_finding::PathPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Startup configuration of the conversion engine.
///
/// Loaded from a JSON file; every field is optional.
///
/// ```json
/// { "path_policy": "minimum_rate" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub path_policy: PathPolicy,
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply the `calculate-min` switch: when set, it forces the
    /// minimum-rate policy regardless of the file.
    pub fn with_calculate_min(mut self, calculate_min: bool) -> Self {
        if calculate_min {
            self.path_policy = PathPolicy::MinimumRate;
        }
        self
    }

    /// Build the one engine instance for this process.
    pub fn build_converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.path_policy)
    }
}
