//! Tombola core - storage and shared types for the prize-drawing toolkit
//!
//! Provides the key-value store abstraction the draw session persists
//! into, a SQLite backed store for the CLI, an in-memory store for tests
//! and ephemeral runs, and media asset slots.

pub mod assets;
pub mod config;
pub mod error;
pub mod storage;

pub use assets::{AssetKind, AssetStore, MediaAsset};
pub use config::StoreConfig;
pub use error::{Result, TombolaError};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stores_are_interchangeable() {
        let temp_dir = tempdir().unwrap();
        let sqlite = SqliteStore::open(&StoreConfig::new(temp_dir.path()))
            .await
            .unwrap();
        let stores: Vec<Box<dyn KeyValueStore>> = vec![Box::new(MemoryStore::new()), Box::new(sqlite)];

        for store in &stores {
            store.set("tombola.session", "{}").await.unwrap();
            assert!(store.contains("tombola.session").await.unwrap());
        }
    }
}
