//! Randomness source for queue orders

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::core::shuffle::fisher_yates;
use crate::traits::Shuffler;

/// Fisher–Yates over a seeded `StdRng`
pub struct RandomShuffler {
    inner: Mutex<StdRng>,
}

impl RandomShuffler {
    /// Seeded from the thread-local generator
    pub fn new() -> Self {
        let seed = rand::thread_rng().gen::<[u8; 32]>();
        Self {
            inner: Mutex::new(StdRng::from_seed(seed)),
        }
    }

    /// Reproducible sequence of orders
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map(Self::from_seed).unwrap_or_default()
    }
}

impl Default for RandomShuffler {
    fn default() -> Self {
        Self::new()
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle(&self, mut names: Vec<String>) -> Vec<String> {
        // A poisoned lock still holds a usable generator
        let mut rng = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        fisher_yates(&mut names, &mut *rng);
        names
    }
}
