use thiserror::Error;

pub type Result<T> = std::result::Result<T, TombolaError>;

#[derive(Error, Debug)]
pub enum TombolaError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Asset not found: {kind}")]
    AssetNotFound { kind: String },

    #[error("Asset checksum mismatch for {kind}")]
    AssetChecksum { kind: String },

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl TombolaError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid_asset(msg: impl Into<String>) -> Self {
        Self::InvalidAsset(msg.into())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for TombolaError {
    fn from(err: dialoguer::Error) -> Self {
        TombolaError::Dialog(err.to_string())
    }
}
