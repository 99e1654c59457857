//! Tombola draw - rounds, rosters and prize pools
//!
//! A presenter imports a roster, configures rounds, winners per round and
//! prizes, then draws each round. Participants win at most once per
//! session, prizes are handed out from a finite pool, and the whole
//! session persists into a [`tombola_core::KeyValueStore`].

pub mod error;
pub mod participant;
pub mod persistence;
pub mod prize;
pub mod selection;
pub mod session;
pub mod settings;
pub mod sheet;
pub mod shortcuts;
pub mod view;

pub use error::{DrawError, Result};
pub use participant::{Participant, Winner};
pub use persistence::{RestoreOutcome, SessionSnapshot, SessionStore};
pub use prize::{Prize, PrizePool, PrizeSpec};
pub use selection::RollingDraw;
pub use session::{Controls, DrawSession, PrizeAward, RoundState};
pub use settings::{AudioSettings, DrawSettings};
pub use sheet::ImportedWorkbook;
pub use shortcuts::Action;
pub use view::{CardGrid, ResultRow, RoundView};

use std::path::Path;

/// Read a workbook and load it into the session
pub fn import_workbook(session: &mut DrawSession, path: &Path) -> Result<ImportedWorkbook> {
    let imported = sheet::read_workbook(path)?;
    session.apply_import(imported.participants.clone(), imported.prizes.clone())?;
    Ok(imported)
}
