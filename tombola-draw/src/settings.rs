use crate::prize::PrizeSpec;
use crate::{DrawError, Result};
use serde::{Deserialize, Serialize};

pub const MAX_VOLUME: u8 = 100;

/// Round layout and prize configuration, saved as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub total_rounds: u32,
    pub winners_per_round: u32,
    pub prizes: Vec<PrizeSpec>,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            total_rounds: 1,
            winners_per_round: 1,
            prizes: Vec::new(),
        }
    }
}

impl DrawSettings {
    pub fn new(total_rounds: u32, winners_per_round: u32) -> Self {
        Self {
            total_rounds,
            winners_per_round,
            prizes: Vec::new(),
        }
    }

    pub fn with_prizes(mut self, prizes: Vec<PrizeSpec>) -> Self {
        self.prizes = prizes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(DrawError::invalid_settings("At least one round is required"));
        }

        if self.winners_per_round == 0 {
            return Err(DrawError::invalid_settings(
                "At least one winner per round is required",
            ));
        }

        Ok(())
    }
}

/// Playback preferences carried with the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub music_enabled: bool,
    pub sound_enabled: bool,
    pub music_volume: u8,
    pub sound_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sound_enabled: true,
            music_volume: 50,
            sound_volume: 50,
        }
    }
}

impl AudioSettings {
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn set_volumes(&mut self, music: Option<u8>, sound: Option<u8>) -> Result<()> {
        for volume in [music, sound].into_iter().flatten() {
            if volume > MAX_VOLUME {
                return Err(DrawError::invalid_settings(format!(
                    "Volume must be between 0 and {}, got {}",
                    MAX_VOLUME, volume
                )));
            }
        }

        if let Some(volume) = music {
            self.music_volume = volume;
        }
        if let Some(volume) = sound {
            self.sound_volume = volume;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.music_volume > MAX_VOLUME || self.sound_volume > MAX_VOLUME {
            return Err(DrawError::invalid_settings("Volume out of range"));
        }
        Ok(())
    }
}
