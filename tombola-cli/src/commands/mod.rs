pub mod audio;
pub mod draw;
pub mod present;
pub mod results;
pub mod setup;

pub use audio::{handle_audio_command, AudioCommands};
pub use draw::{draw_prizes, draw_round, handle_round_command, RoundCommands};
pub use present::present;
pub use results::{export_results, show_results, show_roster, show_status};
pub use setup::{clear_data, handle_settings, import_roster, SettingsArgs};

use anyhow::Result;
use dialoguer::Confirm;
use tombola_core::TombolaError;
use tombola_draw::{DrawSession, SessionStore};

/// Loaded session plus the store it is written back to
pub struct Context {
    pub store: SessionStore,
    pub session: DrawSession,
}

impl Context {
    pub fn new(store: SessionStore, session: DrawSession) -> Self {
        Self { store, session }
    }

    /// Persist after every mutating action
    pub async fn save(&self) -> Result<()> {
        self.store.save(&self.session).await?;
        Ok(())
    }
}

/// Ask before a destructive action unless `yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(TombolaError::from)?;

    Ok(confirmed)
}
