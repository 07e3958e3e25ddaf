//! Assessment storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where answers and assessment records are written
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend kind
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory of the file backend
    pub data_dir: Option<PathBuf>,
}

/// Storage backend kind
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory, lost on exit
    #[default]
    Memory,
    /// YAML files per patient
    File,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.is_none() {
            return Err(ValidationError::MissingRequired("storage.data_dir"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_is_default() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_backend_requires_data_dir() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: None,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.data_dir"))
        );
    }
}
