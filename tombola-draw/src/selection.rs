use crate::participant::Participant;
use rand::Rng;

/// Draw `count` distinct entries from `available` uniformly without
/// replacement, returned in selection order.
///
/// Each step picks a uniform index into the shrinking pool and removes it
/// (a partial Fisher-Yates shuffle). Stops early if the pool runs dry, the
/// caller is expected to have checked `count <= available.len()`.
pub fn select_without_replacement<T, R: Rng + ?Sized>(
    mut available: Vec<T>,
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut picked = Vec::with_capacity(count.min(available.len()));

    while picked.len() < count && !available.is_empty() {
        let index = rng.gen_range(0..available.len());
        picked.push(available.swap_remove(index));
    }

    picked
}

/// Display-only state while a round is rolling
#[derive(Debug, Clone)]
pub struct RollingDraw {
    round: u32,
    slots: usize,
    candidates: Vec<Participant>,
}

impl RollingDraw {
    pub(crate) fn new(round: u32, slots: usize, candidates: Vec<Participant>) -> Self {
        Self {
            round,
            slots,
            candidates,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// One animation frame: `slots` candidates sampled with replacement
    pub fn frame<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&Participant> {
        if self.candidates.is_empty() {
            return Vec::new();
        }

        (0..self.slots)
            .map(|_| &self.candidates[rng.gen_range(0..self.candidates.len())])
            .collect()
    }
}
