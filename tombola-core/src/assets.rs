use crate::error::{Result, TombolaError};
use crate::storage::KeyValueStore;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const ASSET_KEY_PREFIX: &str = "tombola.asset.";

const ASSET_VERSION: u32 = 1;

/// Uploaded media slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    BackgroundMusic,
    RollSound,
    WinSound,
    Background,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::BackgroundMusic,
        AssetKind::RollSound,
        AssetKind::WinSound,
        AssetKind::Background,
    ];

    pub fn slot(&self) -> &'static str {
        match self {
            AssetKind::BackgroundMusic => "bgm",
            AssetKind::RollSound => "roll",
            AssetKind::WinSound => "win",
            AssetKind::Background => "background",
        }
    }

    pub fn store_key(&self) -> String {
        format!("{}{}", ASSET_KEY_PREFIX, self.slot())
    }

    pub fn is_audio(&self) -> bool {
        !matches!(self, AssetKind::Background)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot())
    }
}

impl FromStr for AssetKind {
    type Err = TombolaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bgm" | "music" => Ok(AssetKind::BackgroundMusic),
            "roll" => Ok(AssetKind::RollSound),
            "win" => Ok(AssetKind::WinSound),
            "background" | "bg" => Ok(AssetKind::Background),
            _ => Err(TombolaError::invalid_asset(format!(
                "Unknown asset slot: {}. Supported slots: bgm, roll, win, background",
                s
            ))),
        }
    }
}

/// A media file kept as a base64 data URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub version: u32,
    pub kind: AssetKind,
    pub file_name: String,
    pub mime_type: String,
    pub data_url: String,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

impl MediaAsset {
    pub fn from_bytes(kind: AssetKind, file_name: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(TombolaError::invalid_asset(format!("{} is empty", file_name)));
        }

        let mime_type = mime_for(file_name)?;
        if kind.is_audio() != mime_type.starts_with("audio/") {
            return Err(TombolaError::invalid_asset(format!(
                "{} ({}) cannot be used for the {} slot",
                file_name, mime_type, kind
            )));
        }

        let data_url = format!(
            "data:{};base64,{}",
            mime_type,
            general_purpose::STANDARD.encode(bytes)
        );

        Ok(Self {
            version: ASSET_VERSION,
            kind,
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            data_url,
            checksum: calculate_checksum(bytes),
            uploaded_at: Utc::now(),
        })
    }

    pub async fn from_file(kind: AssetKind, path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(kind, &file_name, &bytes)
    }

    /// Decode the payload and verify it against the stored checksum
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let encoded = self
            .data_url
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| TombolaError::invalid_asset("Data URL is not base64 encoded"))?;

        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| TombolaError::invalid_asset(format!("Invalid base64 payload: {}", e)))?;

        if calculate_checksum(&bytes) != self.checksum {
            return Err(TombolaError::AssetChecksum {
                kind: self.kind.to_string(),
            });
        }

        Ok(bytes)
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.bytes()?.len())
    }
}

/// Per-slot asset persistence on top of a key-value store
pub struct AssetStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> AssetStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub async fn save(&self, asset: &MediaAsset) -> Result<()> {
        let json = serde_json::to_string(asset)?;
        self.store.set(&asset.kind.store_key(), &json).await?;

        tracing::info!("Stored {} asset '{}'", asset.kind, asset.file_name);
        Ok(())
    }

    pub async fn load(&self, kind: AssetKind) -> Result<Option<MediaAsset>> {
        let Some(json) = self.store.get(&kind.store_key()).await? else {
            return Ok(None);
        };

        let asset: MediaAsset = serde_json::from_str(&json)?;
        asset.bytes()?;
        Ok(Some(asset))
    }

    pub async fn remove(&self, kind: AssetKind) -> Result<()> {
        if !self.store.contains(&kind.store_key()).await? {
            return Err(TombolaError::AssetNotFound {
                kind: kind.to_string(),
            });
        }

        self.store.remove(&kind.store_key()).await?;
        tracing::info!("Removed {} asset", kind);
        Ok(())
    }

    /// Slots that currently hold an asset
    pub async fn list(&self) -> Result<Vec<AssetKind>> {
        let keys = self.store.keys_with_prefix(ASSET_KEY_PREFIX).await?;

        Ok(AssetKind::ALL
            .into_iter()
            .filter(|kind| keys.contains(&kind.store_key()))
            .collect())
    }

    pub async fn clear(&self) -> Result<()> {
        for key in self.store.keys_with_prefix(ASSET_KEY_PREFIX).await? {
            self.store.remove(&key).await?;
        }
        Ok(())
    }
}

fn mime_for(file_name: &str) -> Result<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => Ok("audio/mpeg"),
        "wav" => Ok("audio/wav"),
        "ogg" => Ok("audio/ogg"),
        "m4a" => Ok("audio/mp4"),
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(TombolaError::invalid_asset(format!(
            "Unsupported media file: {}",
            file_name
        ))),
    }
}

/// Calculate SHA256 checksum
fn calculate_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
