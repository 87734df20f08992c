//! Deterministic per-actor RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each actor gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (actor_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive actor IDs uniformly across the seed space.
//! This means:
//!
//! - Actors never share RNG state (no contention, no ordering dependency).
//! - Adding actors at the end of the population does not disturb the draws of
//!   existing actors, so a population is reproducible as it grows.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ActorId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-actor deterministic RNG.
///
/// Drivers use it to draw an actor's class and occupation time.
pub struct ActorRng(SmallRng);

impl ActorRng {
    /// Seed deterministically from the run's global seed and an actor ID.
    pub fn new(global_seed: u64, actor: ActorId) -> Self {
        let seed = global_seed ^ (actor.0 as u64).wrapping_mul(MIXING_CONSTANT);
        ActorRng(SmallRng::seed_from_u64(seed))
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
