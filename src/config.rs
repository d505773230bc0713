//! Adapter configuration, loaded from YAML.
//!
//! ```yaml
//! endpoint: "http://localhost:8080/api/graphql"
//! dataset_id: "dataset_prices"
//! test_mode: true
//! page_size: 100
//! fields:
//!   price: number
//!   name: string
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::client::{is_graphql_name, DatasetId, DEFAULT_ROOT_FIELD};
use crate::datasource::{DataSourceOptions, FieldKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdapterConfig {
    /// Query endpoint of the data service.
    pub endpoint: String,
    pub dataset_id: String,
    /// Root field the data query is answered under.
    #[serde(default = "default_query_name")]
    pub query_name: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Appends `testMode=true` to the endpoint.
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Declared grid type of each field, keyed by field id.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldKind>,
}

fn default_query_name() -> String {
    DEFAULT_ROOT_FIELD.to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl AdapterConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if self.dataset_id.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset_id must not be empty".into()));
        }
        if !is_graphql_name(&self.query_name) {
            return Err(ConfigError::Invalid(format!(
                "query_name '{}' is not a GraphQL name",
                self.query_name
            )));
        }
        Ok(())
    }

    pub fn dataset(&self) -> DatasetId {
        DatasetId::new(self.dataset_id.clone())
    }

    /// The endpoint with the `testMode` flag applied.
    pub fn endpoint_url(&self) -> String {
        if !self.test_mode {
            return self.endpoint.clone();
        }
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}testMode=true", self.endpoint, separator)
    }

    /// The grid-side data-source declaration for this dataset.
    pub fn data_source_options(&self) -> DataSourceOptions {
        DataSourceOptions::new(self.page_size).with_fields(self.fields.clone())
    }
}
