use crate::participant::{Participant, Winner};
use crate::prize::PrizePool;
use crate::session::DrawSession;
use crate::settings::AudioSettings;
use crate::{DrawError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tombola_core::{AssetStore, KeyValueStore};
use uuid::Uuid;

pub const SESSION_KEY: &str = "tombola.session";
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to rehydrate a [`DrawSession`], stored as one JSON blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub session_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub winners: BTreeMap<u32, Vec<Winner>>,
    pub drawn_rounds: Vec<u32>,
    pub current_round: u32,
    pub total_rounds: u32,
    pub winners_per_round: u32,
    pub prizes: PrizePool,
    #[serde(default)]
    pub audio: AudioSettings,
}

/// How startup rehydration went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Fresh,
    Restored,
    Discarded { reason: String },
}

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn assets(&self) -> AssetStore<'_> {
        AssetStore::new(self.store.as_ref())
    }

    pub async fn save(&self, session: &DrawSession) -> Result<()> {
        let json = serde_json::to_string(&session.to_snapshot())?;
        self.store.set(SESSION_KEY, &json).await?;

        tracing::debug!("Saved session {} ({} bytes)", session.id(), json.len());
        Ok(())
    }

    /// Strict load: a blob that fails to parse or validate is an error
    pub async fn load(&self) -> Result<Option<DrawSession>> {
        let Some(json) = self.store.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        let snapshot: SessionSnapshot =
            serde_json::from_str(&json).map_err(|e| DrawError::corrupt(e.to_string()))?;
        Ok(Some(DrawSession::from_snapshot(snapshot)?))
    }

    /// Startup rehydration. Unreadable state is wiped, assets included,
    /// and a fresh session takes its place.
    pub async fn restore(&self) -> Result<(DrawSession, RestoreOutcome)> {
        match self.load().await {
            Ok(Some(session)) => {
                tracing::info!("Restored session {}", session.id());
                Ok((session, RestoreOutcome::Restored))
            }
            Ok(None) => Ok((DrawSession::new(), RestoreOutcome::Fresh)),
            Err(DrawError::CorruptState(reason)) => {
                tracing::warn!("Discarding stored session: {}", reason);
                self.clear().await?;
                Ok((DrawSession::new(), RestoreOutcome::Discarded { reason }))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(SESSION_KEY).await?;
        self.assets().clear().await?;

        tracing::info!("Cleared stored session and assets");
        Ok(())
    }
}
