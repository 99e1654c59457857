use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prize as configured in settings or read from a workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeSpec {
    pub name: String,
    pub count: u32,
}

impl PrizeSpec {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    name: String,
    count: u32,
    remaining: u32,
}

impl Prize {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            remaining: count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_available(&self) -> bool {
        self.remaining > 0
    }

    pub fn spec(&self) -> PrizeSpec {
        PrizeSpec::new(self.name.clone(), self.count)
    }

    fn take_one(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Named prizes with finite stock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizePool {
    prizes: Vec<Prize>,
}

impl PrizePool {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self { prizes }
    }

    /// Blank names are dropped, a zero count is treated as one
    pub fn from_specs(specs: &[PrizeSpec]) -> Self {
        let prizes = specs
            .iter()
            .filter(|spec| !spec.name.trim().is_empty())
            .map(|spec| Prize::new(spec.name.trim(), spec.count.max(1)))
            .collect();

        Self { prizes }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn specs(&self) -> Vec<PrizeSpec> {
        self.prizes.iter().map(Prize::spec).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn has_available(&self) -> bool {
        self.prizes.iter().any(Prize::is_available)
    }

    pub fn total_remaining(&self) -> u32 {
        self.prizes.iter().map(Prize::remaining).sum()
    }

    /// Pick uniformly among prize types with stock left and take one.
    /// Returns `None` once the pool is exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        let available: Vec<usize> = self
            .prizes
            .iter()
            .enumerate()
            .filter(|(_, prize)| prize.is_available())
            .map(|(index, _)| index)
            .collect();

        if available.is_empty() {
            return None;
        }

        let prize = &mut self.prizes[available[rng.gen_range(0..available.len())]];
        prize.take_one().then(|| prize.name.clone())
    }

    pub(crate) fn restock(&mut self) {
        for prize in &mut self.prizes {
            prize.remaining = prize.count;
        }
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.prizes.iter().all(|prize| prize.remaining <= prize.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_from_specs_filters_blank_names() {
        let pool = PrizePool::from_specs(&[
            PrizeSpec::new("Laptop", 2),
            PrizeSpec::new("   ", 5),
            PrizeSpec::new("Mug", 0),
        ]);

        assert_eq!(pool.prizes().len(), 2);
        assert_eq!(pool.prizes()[1].count(), 1);
        assert_eq!(pool.total_remaining(), 3);
    }

    #[test]
    fn test_draw_never_goes_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = PrizePool::from_specs(&[PrizeSpec::new("Laptop", 1), PrizeSpec::new("Mug", 2)]);

        let mut drawn = Vec::new();
        while let Some(name) = pool.draw(&mut rng) {
            drawn.push(name);
        }

        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn.iter().filter(|n| *n == "Laptop").count(), 1);
        assert!(!pool.has_available());
        assert!(pool.draw(&mut rng).is_none());
        assert!(pool.prizes().iter().all(|p| p.remaining() == 0));
    }

    #[test]
    fn test_restock() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = PrizePool::from_specs(&[PrizeSpec::new("Mug", 2)]);
        pool.draw(&mut rng);
        assert_eq!(pool.total_remaining(), 1);

        pool.restock();
        assert_eq!(pool.total_remaining(), 2);
        assert!(pool.is_consistent());
    }
}
