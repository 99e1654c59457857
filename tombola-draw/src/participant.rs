use serde::{Deserialize, Serialize};

pub const UNKNOWN_DEPARTMENT: &str = "unknown";

/// Roster entry. Identity is the position in the roster, names may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    department: String,
    has_won: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, department: Option<String>) -> Self {
        let department = department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string());

        Self {
            name: name.into(),
            department,
            has_won: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub(crate) fn set_won(&mut self) {
        self.has_won = true;
    }

    pub(crate) fn reset(&mut self) {
        self.has_won = false;
    }
}

/// A participant recorded as a round winner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub roster_index: usize,
    pub name: String,
    pub department: String,
    pub prize: Option<String>,
}

impl Winner {
    pub fn new(roster_index: usize, participant: &Participant) -> Self {
        Self {
            roster_index,
            name: participant.name().to_string(),
            department: participant.department().to_string(),
            prize: None,
        }
    }

    pub fn has_prize(&self) -> bool {
        self.prize.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_defaults_to_unknown() {
        assert_eq!(Participant::new("Ana", None).department(), UNKNOWN_DEPARTMENT);
        assert_eq!(
            Participant::new("Ana", Some("  ".to_string())).department(),
            UNKNOWN_DEPARTMENT
        );
        assert_eq!(
            Participant::new("Ana", Some(" Sales ".to_string())).department(),
            "Sales"
        );
    }

    #[test]
    fn test_winner_snapshot() {
        let mut participant = Participant::new("Bo", Some("R&D".to_string()));
        participant.set_won();

        let winner = Winner::new(3, &participant);
        assert_eq!(winner.roster_index, 3);
        assert_eq!(winner.department, "R&D");
        assert!(!winner.has_prize());
    }
}
