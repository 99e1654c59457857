use crate::participant::{Participant, Winner};
use crate::persistence::{SessionSnapshot, SNAPSHOT_VERSION};
use crate::prize::{PrizePool, PrizeSpec};
use crate::selection::{select_without_replacement, RollingDraw};
use crate::settings::{AudioSettings, DrawSettings};
use crate::{DrawError, Result};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use uuid::Uuid;

/// Per-round drawing state, one-way until settings are saved again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    NotDrawn,
    Drawn,
}

/// Which presenter actions are currently allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub can_start: bool,
    pub can_previous: bool,
    pub can_next: bool,
    pub can_draw_prizes: bool,
}

/// A prize handed to a winner by [`DrawSession::draw_prizes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeAward {
    pub winner: String,
    pub prize: String,
}

#[derive(Debug, Clone)]
pub struct DrawSession {
    id: Uuid,
    participants: Vec<Participant>,
    winners: BTreeMap<u32, Vec<Winner>>,
    drawn_rounds: BTreeSet<u32>,
    current_round: u32,
    total_rounds: u32,
    winners_per_round: u32,
    prizes: PrizePool,
    audio: AudioSettings,
}

impl Default for DrawSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSession {
    pub fn new() -> Self {
        let settings = DrawSettings::default();

        Self {
            id: Uuid::new_v4(),
            participants: Vec::new(),
            winners: BTreeMap::new(),
            drawn_rounds: BTreeSet::new(),
            current_round: 1,
            total_rounds: settings.total_rounds,
            winners_per_round: settings.winners_per_round,
            prizes: PrizePool::default(),
            audio: AudioSettings::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn winners_per_round(&self) -> u32 {
        self.winners_per_round
    }

    pub fn prizes(&self) -> &PrizePool {
        &self.prizes
    }

    pub fn audio(&self) -> &AudioSettings {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioSettings {
        &mut self.audio
    }

    pub fn settings(&self) -> DrawSettings {
        DrawSettings::new(self.total_rounds, self.winners_per_round).with_prizes(self.prizes.specs())
    }

    /// Winners of `round` in selection order, empty if not drawn
    pub fn winners(&self, round: u32) -> &[Winner] {
        self.winners.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn round_state(&self, round: u32) -> RoundState {
        if self.drawn_rounds.contains(&round) {
            RoundState::Drawn
        } else {
            RoundState::NotDrawn
        }
    }

    pub fn has_results(&self) -> bool {
        self.winners.values().any(|winners| !winners.is_empty())
    }

    pub fn total_winners(&self) -> usize {
        self.winners.values().map(Vec::len).sum()
    }

    pub fn available_count(&self) -> usize {
        self.participants.iter().filter(|p| !p.has_won()).count()
    }

    /// Replace the roster. Recorded results point into the old roster, so
    /// every round goes back to `NotDrawn` and the prize pool is restocked.
    pub fn replace_roster(&mut self, participants: Vec<Participant>) -> Result<()> {
        if participants.is_empty() {
            return Err(DrawError::import("No participants in roster"));
        }

        self.participants = participants;
        self.prizes.restock();
        self.reset_draws();

        tracing::info!(
            "Session {} imported {} participants",
            self.id,
            self.participants.len()
        );
        Ok(())
    }

    /// Import a roster and, when the workbook carried one, its prize list
    pub fn apply_import(
        &mut self,
        participants: Vec<Participant>,
        prizes: Option<Vec<PrizeSpec>>,
    ) -> Result<()> {
        self.replace_roster(participants)?;

        if let Some(prizes) = prizes {
            self.prizes = PrizePool::from_specs(&prizes);
            tracing::info!(
                "Session {} imported {} prize types",
                self.id,
                self.prizes.prizes().len()
            );
        }

        Ok(())
    }

    /// Any settings save discards recorded winners, prize-only edits
    /// included
    pub fn requires_confirmation(&self) -> bool {
        self.has_results()
    }

    /// Apply settings. Always clears every round and the won flags.
    pub fn save_settings(&mut self, settings: DrawSettings) -> Result<()> {
        settings.validate()?;

        self.total_rounds = settings.total_rounds;
        self.winners_per_round = settings.winners_per_round;
        self.prizes = PrizePool::from_specs(&settings.prizes);
        self.reset_draws();

        tracing::info!(
            "Session {} settings saved: {} rounds x {} winners, {} prize types",
            self.id,
            self.total_rounds,
            self.winners_per_round,
            self.prizes.prizes().len()
        );
        Ok(())
    }

    fn reset_draws(&mut self) {
        self.winners.clear();
        self.drawn_rounds.clear();
        self.current_round = 1;
        for participant in &mut self.participants {
            participant.reset();
        }
    }

    fn available_indices(&self) -> Vec<usize> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.has_won())
            .map(|(index, _)| index)
            .collect()
    }

    fn check_can_draw(&self) -> Result<Vec<usize>> {
        if self.round_state(self.current_round) == RoundState::Drawn {
            return Err(DrawError::RoundAlreadyDrawn(self.current_round));
        }

        if self.participants.is_empty() {
            return Err(DrawError::NoRoster);
        }

        let available = self.available_indices();
        if available.is_empty() {
            return Err(DrawError::AllParticipantsWon);
        }

        let need = self.winners_per_round as usize;
        if available.len() < need {
            return Err(DrawError::NotEnoughParticipants {
                need,
                available: available.len(),
            });
        }

        Ok(available)
    }

    /// Validate the current round and start rolling over the remaining
    /// participants. Nothing is recorded until [`Self::draw_round`].
    pub fn begin_draw(&self) -> Result<RollingDraw> {
        let available = self.check_can_draw()?;
        let candidates = available
            .into_iter()
            .map(|index| self.participants[index].clone())
            .collect();

        Ok(RollingDraw::new(
            self.current_round,
            self.winners_per_round as usize,
            candidates,
        ))
    }

    /// Pick the winners for the current round and mark it drawn
    pub fn draw_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Winner>> {
        let available = self.check_can_draw()?;
        let picked = select_without_replacement(available, self.winners_per_round as usize, rng);

        let mut winners = Vec::with_capacity(picked.len());
        for index in picked {
            let participant = &mut self.participants[index];
            participant.set_won();
            winners.push(Winner::new(index, participant));
        }

        self.winners
            .entry(self.current_round)
            .or_default()
            .extend(winners.iter().cloned());
        self.drawn_rounds.insert(self.current_round);

        tracing::info!(
            "Session {} round {} drew {} winners: {}",
            self.id,
            self.current_round,
            winners.len(),
            winners
                .iter()
                .map(|w| w.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(winners)
    }

    /// Hand prizes to current-round winners that have none yet, stopping
    /// when the pool runs out
    pub fn draw_prizes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<PrizeAward>> {
        let round = self.current_round;
        if self.round_state(round) != RoundState::Drawn {
            return Err(DrawError::RoundNotDrawn(round));
        }

        if !self.winners(round).iter().any(|w| !w.has_prize()) {
            return Err(DrawError::NoPendingWinners(round));
        }

        if !self.prizes.has_available() {
            return Err(DrawError::PrizesExhausted);
        }

        let mut awards = Vec::new();
        if let Some(winners) = self.winners.get_mut(&round) {
            for winner in winners.iter_mut().filter(|w| !w.has_prize()) {
                let Some(prize) = self.prizes.draw(rng) else {
                    break;
                };

                winner.prize = Some(prize.clone());
                awards.push(PrizeAward {
                    winner: winner.name.clone(),
                    prize,
                });
            }
        }

        tracing::info!(
            "Session {} round {} handed out {} prizes, {} left",
            self.id,
            round,
            awards.len(),
            self.prizes.total_remaining()
        );

        Ok(awards)
    }

    pub fn previous_round(&mut self) -> Result<u32> {
        self.go_to_round(self.current_round.saturating_sub(1))
    }

    pub fn next_round(&mut self) -> Result<u32> {
        self.go_to_round(self.current_round.saturating_add(1))
    }

    /// Change the displayed round; never triggers a draw
    pub fn go_to_round(&mut self, round: u32) -> Result<u32> {
        if round == 0 || round > self.total_rounds {
            return Err(DrawError::RoundOutOfRange {
                round,
                total: self.total_rounds,
            });
        }

        self.current_round = round;
        Ok(round)
    }

    pub fn controls(&self) -> Controls {
        let drawn = self.round_state(self.current_round) == RoundState::Drawn;
        let pending = self
            .winners(self.current_round)
            .iter()
            .any(|w| !w.has_prize());

        Controls {
            can_start: !drawn,
            can_previous: self.current_round > 1,
            can_next: self.current_round < self.total_rounds,
            can_draw_prizes: drawn && pending && self.prizes.has_available(),
        }
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            session_id: self.id,
            saved_at: Utc::now(),
            participants: self.participants.clone(),
            winners: self.winners.clone(),
            drawn_rounds: self.drawn_rounds.iter().copied().collect(),
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            winners_per_round: self.winners_per_round,
            prizes: self.prizes.clone(),
            audio: self.audio.clone(),
        }
    }

    /// Rebuild a session, rejecting snapshots that break the invariants
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DrawError::corrupt(format!(
                "Unsupported snapshot version {}",
                snapshot.version
            )));
        }

        DrawSettings::new(snapshot.total_rounds, snapshot.winners_per_round)
            .validate()
            .map_err(|e| DrawError::corrupt(e.to_string()))?;
        snapshot
            .audio
            .validate()
            .map_err(|e| DrawError::corrupt(e.to_string()))?;

        let rounds = 1..=snapshot.total_rounds;
        if !rounds.contains(&snapshot.current_round) {
            return Err(DrawError::corrupt(format!(
                "Current round {} outside 1..={}",
                snapshot.current_round, snapshot.total_rounds
            )));
        }

        let drawn_rounds: BTreeSet<u32> = snapshot.drawn_rounds.into_iter().collect();
        if let Some(round) = drawn_rounds.iter().find(|r| !rounds.contains(*r)) {
            return Err(DrawError::corrupt(format!("Drawn round {} out of range", round)));
        }

        let mut seen = HashSet::new();
        for (round, winners) in &snapshot.winners {
            if !drawn_rounds.contains(round) {
                return Err(DrawError::corrupt(format!(
                    "Round {} has winners but is not drawn",
                    round
                )));
            }

            for winner in winners {
                let won = snapshot
                    .participants
                    .get(winner.roster_index)
                    .map_or(false, Participant::has_won);
                if !won {
                    return Err(DrawError::corrupt(format!(
                        "Winner '{}' does not match a winning participant",
                        winner.name
                    )));
                }

                if !seen.insert(winner.roster_index) {
                    return Err(DrawError::corrupt(format!(
                        "Participant '{}' won more than once",
                        winner.name
                    )));
                }
            }
        }

        // a won flag without a recorded win would lock that person out
        if let Some(orphan) = snapshot
            .participants
            .iter()
            .enumerate()
            .find(|(index, p)| p.has_won() && !seen.contains(index))
        {
            return Err(DrawError::corrupt(format!(
                "Participant '{}' is marked as won but appears in no round",
                orphan.1.name()
            )));
        }

        if !snapshot.prizes.is_consistent() {
            return Err(DrawError::corrupt("Prize remaining exceeds its count"));
        }

        Ok(Self {
            id: snapshot.session_id,
            participants: snapshot.participants,
            winners: snapshot.winners,
            drawn_rounds,
            current_round: snapshot.current_round,
            total_rounds: snapshot.total_rounds,
            winners_per_round: snapshot.winners_per_round,
            prizes: snapshot.prizes,
            audio: snapshot.audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn roster(size: usize) -> Vec<Participant> {
        (0..size)
            .map(|i| Participant::new(format!("Person {}", i), Some(format!("Dept {}", i % 3))))
            .collect()
    }

    fn session(size: usize, rounds: u32, per_round: u32) -> DrawSession {
        let mut session = DrawSession::new();
        session.replace_roster(roster(size)).unwrap();
        session
            .save_settings(DrawSettings::new(rounds, per_round))
            .unwrap();
        session
    }

    #[test]
    fn test_five_people_one_round_two_winners() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = session(5, 1, 2);

        let winners = session.draw_round(&mut rng).unwrap();

        assert_eq!(winners.len(), 2);
        assert_ne!(winners[0].roster_index, winners[1].roster_index);
        for winner in &winners {
            assert!(session.participants()[winner.roster_index].has_won());
        }
        assert_eq!(session.round_state(1), RoundState::Drawn);
        assert!(!session.controls().can_start);
        assert!(matches!(
            session.draw_round(&mut rng),
            Err(DrawError::RoundAlreadyDrawn(1))
        ));
    }

    #[test]
    fn test_nobody_wins_twice() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = session(12, 4, 3);

        for round in 1..=4 {
            session.go_to_round(round).unwrap();
            session.draw_round(&mut rng).unwrap();
        }

        let mut seen = HashSet::new();
        for round in 1..=4 {
            for winner in session.winners(round) {
                assert!(seen.insert(winner.roster_index));
            }
        }
        assert_eq!(seen.len(), 12);
        assert_eq!(session.available_count(), 0);

        session.save_settings(DrawSettings::new(5, 3)).unwrap();
        session.go_to_round(5).unwrap();
        session.participants.iter_mut().for_each(Participant::set_won);
        assert!(matches!(
            session.draw_round(&mut rng),
            Err(DrawError::AllParticipantsWon)
        ));
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut rng = StdRng::seed_from_u64(2);

        let mut empty = DrawSession::new();
        assert!(matches!(empty.begin_draw(), Err(DrawError::NoRoster)));
        assert!(matches!(empty.draw_round(&mut rng), Err(DrawError::NoRoster)));

        let mut short = session(3, 2, 2);
        short.draw_round(&mut rng).unwrap();
        short.next_round().unwrap();

        let before = short.to_snapshot();
        assert!(matches!(
            short.draw_round(&mut rng),
            Err(DrawError::NotEnoughParticipants { need: 2, available: 1 })
        ));
        assert_eq!(short.winners(2).len(), 0);
        assert_eq!(short.round_state(2), RoundState::NotDrawn);
        assert_eq!(short.to_snapshot().participants, before.participants);
    }

    #[test]
    fn test_save_settings_resets_rounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = session(10, 3, 2);
        session.draw_round(&mut rng).unwrap();
        session.next_round().unwrap();
        session.draw_round(&mut rng).unwrap();

        let changed = DrawSettings::new(4, 1);
        assert!(session.requires_confirmation());

        session.save_settings(changed).unwrap();

        assert!(!session.has_results());
        assert_eq!(session.current_round(), 1);
        assert!((1..=4).all(|r| session.round_state(r) == RoundState::NotDrawn));
        assert_eq!(session.available_count(), 10);
    }

    #[test]
    fn test_prize_only_change_still_needs_confirmation() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut session = session(6, 2, 2);
        assert!(!session.requires_confirmation());

        session.draw_round(&mut rng).unwrap();
        assert!(session.requires_confirmation());

        let prizes_only = session
            .settings()
            .with_prizes(vec![PrizeSpec::new("Mug", 3)]);
        session.save_settings(prizes_only).unwrap();

        assert!(!session.has_results());
        assert!(!session.requires_confirmation());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut session = session(4, 2, 1);
        assert!(session.save_settings(DrawSettings::new(0, 1)).is_err());
        assert_eq!(session.total_rounds(), 2);
    }

    #[test]
    fn test_begin_draw_snapshot() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = session(6, 2, 2);

        let rolling = session.begin_draw().unwrap();
        assert_eq!(rolling.round(), 1);
        assert_eq!(rolling.candidate_count(), 6);
        assert_eq!(rolling.frame(&mut rng).len(), 2);
        assert!(!session.has_results());

        session.draw_round(&mut rng).unwrap();
        session.next_round().unwrap();
        assert_eq!(session.begin_draw().unwrap().candidate_count(), 4);
    }

    #[test]
    fn test_prize_assignment() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = DrawSession::new();
        session.replace_roster(roster(10)).unwrap();
        session
            .save_settings(DrawSettings::new(2, 3).with_prizes(vec![
                PrizeSpec::new("Laptop", 1),
                PrizeSpec::new("Mug", 1),
            ]))
            .unwrap();

        assert!(matches!(
            session.draw_prizes(&mut rng),
            Err(DrawError::RoundNotDrawn(1))
        ));

        session.draw_round(&mut rng).unwrap();
        assert!(session.controls().can_draw_prizes);

        let awards = session.draw_prizes(&mut rng).unwrap();
        assert_eq!(awards.len(), 2);
        assert_eq!(session.winners(1).iter().filter(|w| w.has_prize()).count(), 2);
        assert_eq!(session.prizes().total_remaining(), 0);
        assert!(!session.controls().can_draw_prizes);

        assert!(matches!(
            session.draw_prizes(&mut rng),
            Err(DrawError::PrizesExhausted)
        ));
    }

    #[test]
    fn test_prizes_for_fully_awarded_round() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = DrawSession::new();
        session.replace_roster(roster(4)).unwrap();
        session
            .save_settings(DrawSettings::new(2, 1).with_prizes(vec![PrizeSpec::new("Mug", 5)]))
            .unwrap();

        session.draw_round(&mut rng).unwrap();
        session.draw_prizes(&mut rng).unwrap();

        assert!(matches!(
            session.draw_prizes(&mut rng),
            Err(DrawError::NoPendingWinners(1))
        ));
        assert_eq!(session.prizes().total_remaining(), 4);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = session(6, 2, 1);

        let controls = session.controls();
        assert!(controls.can_start && !controls.can_previous && controls.can_next);
        assert!(session.previous_round().is_err());

        assert_eq!(session.next_round().unwrap(), 2);
        assert!(session.next_round().is_err());
        assert_eq!(session.current_round(), 2);
        assert!(!session.has_results());

        session.draw_round(&mut rng).unwrap();
        assert_eq!(session.previous_round().unwrap(), 1);
        assert_eq!(session.round_state(1), RoundState::NotDrawn);
        assert!(session.go_to_round(0).is_err());
    }

    #[test]
    fn test_import_resets_results() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = session(6, 2, 2);
        session.draw_round(&mut rng).unwrap();

        session
            .apply_import(roster(3), Some(vec![PrizeSpec::new("Mug", 2)]))
            .unwrap();

        assert!(!session.has_results());
        assert_eq!(session.participants().len(), 3);
        assert_eq!(session.prizes().total_remaining(), 2);
        assert_eq!(session.total_rounds(), 2);

        assert!(session.replace_roster(Vec::new()).is_err());
        assert_eq!(session.participants().len(), 3);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut session = session(8, 3, 2);
        session.draw_round(&mut rng).unwrap();
        session.next_round().unwrap();

        let restored = DrawSession::from_snapshot(session.to_snapshot()).unwrap();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.current_round(), 2);
        assert_eq!(restored.winners(1), session.winners(1));
        assert_eq!(restored.round_state(1), RoundState::Drawn);
        assert_eq!(restored.available_count(), 6);
    }

    #[test]
    fn test_snapshot_invariants_checked() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut session = session(8, 3, 2);
        session.draw_round(&mut rng).unwrap();

        let mut out_of_range = session.to_snapshot();
        out_of_range.current_round = 4;
        assert!(DrawSession::from_snapshot(out_of_range).is_err());

        let mut duplicated = session.to_snapshot();
        let first = duplicated.winners[&1][0].clone();
        duplicated.winners.get_mut(&1).unwrap().push(first);
        assert!(DrawSession::from_snapshot(duplicated).is_err());

        let mut not_won = session.to_snapshot();
        not_won.participants.iter_mut().for_each(Participant::reset);
        assert!(DrawSession::from_snapshot(not_won).is_err());

        let mut undrawn = session.to_snapshot();
        undrawn.drawn_rounds.clear();
        assert!(DrawSession::from_snapshot(undrawn).is_err());
    }

    #[test]
    fn test_snapshot_rejects_won_flag_without_round() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut session = session(8, 3, 2);
        session.draw_round(&mut rng).unwrap();

        let mut orphaned = session.to_snapshot();
        let winners: HashSet<usize> = session.winners(1).iter().map(|w| w.roster_index).collect();
        let bystander = (0..8).find(|index| !winners.contains(index)).unwrap();
        orphaned.participants[bystander].set_won();

        assert!(matches!(
            DrawSession::from_snapshot(orphaned),
            Err(DrawError::CorruptState(_))
        ));
        assert!(DrawSession::from_snapshot(session.to_snapshot()).is_ok());
    }
}
