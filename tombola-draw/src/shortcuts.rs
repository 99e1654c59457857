use crate::session::Controls;
use std::str::FromStr;

/// Presenter actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleDraw,
    PreviousRound,
    NextRound,
    DrawPrizes,
    Quit,
}

impl Action {
    /// Whether the action may fire given the current controls.
    /// Stopping a running draw is always allowed.
    pub fn is_enabled(&self, controls: &Controls, rolling: bool) -> bool {
        match self {
            Action::ToggleDraw => rolling || controls.can_start,
            Action::PreviousRound => !rolling && controls.can_previous,
            Action::NextRound => !rolling && controls.can_next,
            Action::DrawPrizes => !rolling && controls.can_draw_prizes,
            Action::Quit => true,
        }
    }
}

impl FromStr for Action {
    type Err = String;

    /// Key names as typed on a line. An empty line is Enter, a line of
    /// blanks is Space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Action::DrawPrizes);
        }
        if s.trim().is_empty() {
            return Ok(Action::ToggleDraw);
        }

        match s.trim().to_lowercase().as_str() {
            "space" | "s" => Ok(Action::ToggleDraw),
            "up" | "left" | "p" | "prev" => Ok(Action::PreviousRound),
            "down" | "right" | "n" | "next" => Ok(Action::NextRound),
            "enter" | "prizes" => Ok(Action::DrawPrizes),
            "esc" | "escape" | "q" | "quit" => Ok(Action::Quit),
            other => Err(format!("Unknown key: {}", other)),
        }
    }
}
