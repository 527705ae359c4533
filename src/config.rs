//! Data-set configuration
//!
//! One explicit [`Config`] value describes a data set: the engine index it
//! loads into, optional environment scoping for index names, declared field
//! types, and per-file import settings. It is constructed once (usually
//! from a `data.yaml` at the root of the data directory) and passed by
//! reference into both the import pipeline and the query compiler.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::schema::{FieldType, FieldTypeSource};
use crate::Result;

/// File name the directory loader expects at the data-directory root
pub const CONFIG_FILE: &str = "data.yaml";

fn default_index() -> String {
    "general".to_string()
}

/// Configuration for one data set
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Engine index the data set loads into
    #[serde(default = "default_index")]
    pub index: String,

    /// Environment name prefixed onto index names, e.g. `test-general`
    #[serde(default)]
    pub env: Option<String>,

    /// Declared field types; undeclared fields match as plain text
    #[serde(default)]
    pub types: HashMap<String, FieldType>,

    /// Per-file import settings, keyed by file name
    #[serde(default)]
    pub files: HashMap<String, FileConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: default_index(),
            env: None,
            types: HashMap::new(),
            files: HashMap::new(),
        }
    }
}

/// Import settings for a single file
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    /// API endpoint served from this file's data
    #[serde(default)]
    pub api: Option<String>,

    /// Header renames applied on import: source column name to field name.
    /// Columns without an entry are dropped when a mapping is present.
    #[serde(default)]
    pub fields: Option<HashMap<String, String>>,
}

impl FileConfig {
    /// The endpoint this file's data is served from, `"data"` by default
    pub fn api_endpoint(&self) -> &str {
        self.api.as_deref().unwrap_or("data")
    }
}

impl Config {
    /// Parse a config from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load the `data.yaml` at the root of a data directory
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(data_dir.as_ref().join(CONFIG_FILE))?;
        Self::from_yaml(&text)
    }

    /// The environment-scoped name of this data set's index
    pub fn scoped_index(&self) -> String {
        self.scope(&self.index)
    }

    /// Apply environment scoping to any index name
    pub fn scope(&self, index: &str) -> String {
        match &self.env {
            Some(env) => format!("{env}-{index}"),
            None => index.to_string(),
        }
    }

    /// Resolve an API endpoint to the index serving it
    pub fn index_for_api(&self, api: &str) -> Option<&str> {
        self.files
            .values()
            .any(|file| file.api_endpoint() == api)
            .then_some(self.index.as_str())
    }
}

impl FieldTypeSource for Config {
    fn field_type(&self, field: &str) -> Result<Option<FieldType>> {
        Ok(self.types.get(field).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "\
index: city-data
env: test
types:
  city: name
  age: integer
files:
  cities.csv:
    api: cities
    fields:
      NAME: name
      STATE: state
";

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.index, "city-data");
        assert_eq!(config.env.as_deref(), Some("test"));
        assert_eq!(config.types["city"], FieldType::Name);
        assert_eq!(config.types["age"], FieldType::Integer);

        let file = &config.files["cities.csv"];
        assert_eq!(file.api.as_deref(), Some("cities"));
        assert_eq!(file.fields.as_ref().unwrap()["NAME"], "name");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.index, "general");
        assert_eq!(config.scoped_index(), "general");
        assert!(config.types.is_empty());
    }

    #[test]
    fn test_index_scoping() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.scoped_index(), "test-city-data");
        assert_eq!(config.scope("other"), "test-other");
    }

    #[test]
    fn test_api_resolution() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.index_for_api("cities"), Some("city-data"));
        assert_eq!(config.index_for_api("schools"), None);
    }

    #[test]
    fn test_files_without_api_serve_the_default_endpoint() {
        let config = Config::from_yaml("files:\n  raw.csv: {}\n").unwrap();
        assert_eq!(config.files["raw.csv"].api_endpoint(), "data");
        assert_eq!(config.index_for_api("data"), Some("general"));
    }

    #[test]
    fn test_field_type_lookup() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.field_type("city").unwrap(), Some(FieldType::Name));
        assert_eq!(config.field_type("unknown").unwrap(), None);
    }
}
