//! Deterministic string-keyed roll source.
//!
//! A roll for a key is cached for a configurable interval, so repeated
//! checks against the same key within that window agree ("luck persists")
//! and tests can reproduce outcomes from the seed alone.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
struct CachedRoll {
    value: f64,
    age_secs: f64,
}

#[derive(Debug)]
pub struct Die {
    rng: ChaCha8Rng,
    interval_secs: f64,
    cache: HashMap<String, CachedRoll>,
}

impl Die {
    pub fn new(seed: u64, interval_secs: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            interval_secs,
            cache: HashMap::new(),
        }
    }

    /// Value in `[0, 1)` for `key`, reused while the cached roll is fresh.
    pub fn roll(&mut self, key: &str) -> f64 {
        if let Some(cached) = self.cache.get(key) {
            if cached.age_secs < self.interval_secs {
                return cached.value;
            }
        }
        let value = self.rng.gen::<f64>();
        self.cache.insert(key.to_owned(), CachedRoll { value, age_secs: 0.0 });
        value
    }

    /// True with probability `p`.
    pub fn success(&mut self, key: &str, p: f64) -> bool {
        self.roll(key) < p
    }

    /// Age every cached roll, dropping the stale ones.
    pub fn update(&mut self, dt: f64) {
        let interval = self.interval_secs;
        self.cache.retain(|_, cached| {
            cached.age_secs += dt;
            cached.age_secs < interval
        });
    }
}

/// Normal sample via Box–Muller.
pub fn gaussian(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }
    // 1 - gen() is in (0, 1], keeping ln finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + z * std_dev
}
