//! Render-from-state helpers. Nothing here mutates the session.

use crate::participant::Winner;
use crate::session::{DrawSession, RoundState};

/// What the stage shows for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundView<'a> {
    Ready,
    Winners(&'a [Winner]),
}

/// One exported / listed result line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow<'a> {
    pub round: u32,
    pub winner: &'a Winner,
}

impl DrawSession {
    pub fn round_view(&self, round: u32) -> RoundView<'_> {
        match self.round_state(round) {
            RoundState::Drawn => RoundView::Winners(self.winners(round)),
            RoundState::NotDrawn => RoundView::Ready,
        }
    }

    pub fn current_view(&self) -> RoundView<'_> {
        self.round_view(self.current_round())
    }

    /// Rounds with winners, newest round first
    pub fn history(&self) -> Vec<(u32, &[Winner])> {
        (1..=self.total_rounds())
            .rev()
            .map(|round| (round, self.winners(round)))
            .filter(|(_, winners)| !winners.is_empty())
            .collect()
    }

    /// Every recorded winner in ascending round order
    pub fn results(&self) -> Vec<ResultRow<'_>> {
        (1..=self.total_rounds())
            .flat_map(|round| {
                self.winners(round)
                    .iter()
                    .map(move |winner| ResultRow { round, winner })
            })
            .collect()
    }
}

const GAP: f64 = 20.0;
const MAX_CARD: f64 = 300.0;
const MAX_ROWS: usize = 3;

/// Grid for laying out winner cards in a container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGrid {
    pub cols: usize,
    pub rows: usize,
    pub card_size: f64,
    pub name_font: f64,
    pub department_font: f64,
    pub prize_font: f64,
}

impl CardGrid {
    /// Near-square grid capped at three rows, cards no larger than 300
    pub fn fit(count: usize, width: f64, height: f64) -> Self {
        let count = count.max(1);
        let mut cols = (count as f64).sqrt().ceil() as usize;
        let mut rows = count.div_ceil(cols);

        while rows > MAX_ROWS && cols < count {
            cols += 1;
            rows = count.div_ceil(cols);
        }

        let max_width = (width - (cols as f64 + 1.0) * GAP) / cols as f64;
        let max_height = (height - (rows as f64 + 1.0) * GAP) / rows as f64;
        let card_size = max_width.min(max_height).min(MAX_CARD).max(0.0);

        Self {
            cols,
            rows,
            card_size,
            name_font: (card_size / 4.0).clamp(24.0, 48.0),
            department_font: (card_size / 6.0).clamp(14.0, 24.0),
            prize_font: (card_size / 8.0).clamp(12.0, 16.0),
        }
    }

    /// Shrink the prize font for long names, never below 12
    pub fn prize_font_for(&self, prize: &str) -> f64 {
        let len = prize.chars().count().max(20) as f64;
        (self.prize_font * (20.0 / len)).max(12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Participant;
    use crate::settings::DrawSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_views_follow_state() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut session = DrawSession::new();
        session
            .replace_roster((0..9).map(|i| Participant::new(format!("P{}", i), None)).collect())
            .unwrap();
        session.save_settings(DrawSettings::new(3, 2)).unwrap();

        assert_eq!(session.current_view(), RoundView::Ready);

        session.draw_round(&mut rng).unwrap();
        session.go_to_round(3).unwrap();
        session.draw_round(&mut rng).unwrap();

        assert_eq!(session.round_view(2), RoundView::Ready);
        assert!(matches!(session.round_view(1), RoundView::Winners(w) if w.len() == 2));

        let history: Vec<u32> = session.history().iter().map(|(round, _)| *round).collect();
        assert_eq!(history, vec![3, 1]);

        let results = session.results();
        assert_eq!(results.len(), session.total_winners());
        assert_eq!(results[0].round, 1);
        assert_eq!(results[3].round, 3);
    }

    #[test]
    fn test_grid_shapes() {
        let one = CardGrid::fit(1, 1200.0, 600.0);
        assert_eq!((one.cols, one.rows), (1, 1));
        assert_eq!(one.card_size, 300.0);
        assert_eq!(one.name_font, 48.0);

        let four = CardGrid::fit(4, 1200.0, 600.0);
        assert_eq!((four.cols, four.rows), (2, 2));

        // sqrt(20) rounds up to 5 columns, 4 rows is too tall
        let twenty = CardGrid::fit(20, 1200.0, 600.0);
        assert_eq!((twenty.cols, twenty.rows), (7, 3));
    }

    #[test]
    fn test_fonts_clamped() {
        let tiny = CardGrid::fit(30, 200.0, 100.0);
        assert_eq!(tiny.card_size, 0.0);
        assert_eq!(tiny.name_font, 24.0);
        assert_eq!(tiny.department_font, 14.0);
        assert_eq!(tiny.prize_font, 12.0);

        let big = CardGrid::fit(1, 2000.0, 2000.0);
        assert_eq!(big.prize_font, 16.0);
        assert_eq!(big.prize_font_for("Mug"), 16.0);
        assert_eq!(big.prize_font_for(&"x".repeat(40)), 12.0);
    }
}
