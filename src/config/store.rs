//! Document store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the file-backed document store keeps user documents
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Root directory for stored documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Collection (subdirectory) holding one document per user
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("store.data_dir"));
        }
        let collection = self.collection.trim();
        if collection.is_empty() {
            return Err(ValidationError::MissingRequired("store.collection"));
        }
        if collection.contains(['/', '\\']) || collection == "." || collection == ".." {
            return Err(ValidationError::InvalidCollection);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection: default_collection(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_collection() -> String {
    "users".to_string()
}
