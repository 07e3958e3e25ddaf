//! Question catalog source configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where question documents are read from
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Catalog source kind
    #[serde(default)]
    pub source: CatalogSource,

    /// JSON file of question documents (file source only)
    pub path: Option<PathBuf>,
}

/// Catalog source kind
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Catalog compiled into the binary
    #[default]
    Embedded,
    /// JSON file on disk
    File,
}

impl CatalogConfig {
    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source == CatalogSource::File && self.path.is_none() {
            return Err(ValidationError::MissingRequired("catalog.path"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Embedded,
            path: None,
        }
    }
}
