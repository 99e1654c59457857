use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tombola_core::StoreConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
    pub ephemeral: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tombola"),
            verbose: false,
            ephemeral: false,
        }
    }
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>, verbose: bool, ephemeral: bool) -> Self {
        let mut config = Self::default();
        if let Some(data_dir) = data_dir {
            config.data_dir = data_dir;
        }
        config.verbose = verbose;
        config.ephemeral = ephemeral;
        config
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.data_dir.clone())
    }

    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!(
            "tombola={},tombola_draw={},tombola_core={}",
            level, level, level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_override() {
        let config = CliConfig::new(Some(PathBuf::from("/tmp/draws")), true, false);

        assert_eq!(
            config.store_config().db_path(),
            PathBuf::from("/tmp/draws/tombola.db")
        );
        assert!(config.log_filter().contains("tombola_draw=debug"));
    }

    #[test]
    fn test_default_data_dir() {
        let config = CliConfig::new(None, false, false);
        assert!(config.data_dir.ends_with("tombola"));
        assert!(config.log_filter().starts_with("tombola=info"));
    }
}
