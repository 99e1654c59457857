use thiserror::Error;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("Tombola core error: {0}")]
    Core(#[from] tombola_core::TombolaError),

    #[error("No roster imported yet")]
    NoRoster,

    #[error("Round {0} has already been drawn")]
    RoundAlreadyDrawn(u32),

    #[error("Round {0} has not been drawn yet")]
    RoundNotDrawn(u32),

    #[error("Every participant has already won")]
    AllParticipantsWon,

    #[error("Not enough participants left: need {need}, have {available}")]
    NotEnoughParticipants { need: usize, available: usize },

    #[error("Every winner of round {0} already has a prize")]
    NoPendingWinners(u32),

    #[error("All prizes have been handed out")]
    PrizesExhausted,

    #[error("Round {round} is out of range (1..={total})")]
    RoundOutOfRange { round: u32, total: u32 },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("No winners recorded yet")]
    NothingToExport,

    #[error("Corrupt session state: {0}")]
    CorruptState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DrawError {
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }
}

impl From<calamine::Error> for DrawError {
    fn from(err: calamine::Error) -> Self {
        DrawError::Import(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DrawError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DrawError::Export(err.to_string())
    }
}
