use crate::error::{Result, TombolaError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE: &str = "tombola.db";

/// Where the key-value store lives on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub db_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            db_file: DEFAULT_DB_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.db_file.is_empty() {
            return Err(TombolaError::config("Database file name cannot be empty"));
        }

        if Path::new(&self.db_file).components().count() != 1 {
            return Err(TombolaError::config(format!(
                "Database file name must not contain a path: {}",
                self.db_file
            )));
        }

        Ok(())
    }
}
