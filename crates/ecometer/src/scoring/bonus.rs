use crate::config::BonusMode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Supplies the top-band EcoScore bonus, an integer in `0..=max_bonus`.
pub trait BonusSource: Send + Sync {
    fn draw(&self, max_bonus: u8) -> u8;
}

/// Draws from the thread-local RNG on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomBonus;

impl BonusSource for RandomBonus {
    fn draw(&self, max_bonus: u8) -> u8 {
        rand::thread_rng().gen_range(0..=max_bonus)
    }
}

/// Always returns the same bonus, capped at `max_bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBonus(pub u8);

impl BonusSource for FixedBonus {
    fn draw(&self, max_bonus: u8) -> u8 {
        self.0.min(max_bonus)
    }
}

/// Reproducible sequence of bonuses from a seeded RNG.
#[derive(Debug)]
pub struct SeededBonus {
    rng: Mutex<StdRng>,
}

impl SeededBonus {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl BonusSource for SeededBonus {
    fn draw(&self, max_bonus: u8) -> u8 {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..=max_bonus)
    }
}

pub fn bonus_source(mode: BonusMode) -> Arc<dyn BonusSource> {
    match mode {
        BonusMode::Random => Arc::new(RandomBonus),
        BonusMode::Seeded(seed) => Arc::new(SeededBonus::new(seed)),
        BonusMode::Fixed(value) => Arc::new(FixedBonus(value)),
    }
}
