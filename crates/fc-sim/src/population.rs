//! Fluent builder for the actors of one run.
//!
//! # Usage
//!
//! ```rust
//! use fc_sim::PopulationBuilder;
//!
//! let actors = PopulationBuilder::new(8, /*seed=*/ 42)
//!     .service_ms(10, 40)
//!     .alternating()
//!     .build();
//!
//! assert_eq!(actors.len(), 8);
//! assert!(actors[0].service.as_millis() >= 10);
//! ```

use std::time::Duration;

use fc_core::{ActorId, ActorRng, Class};

use crate::SimConfig;

/// One actor's fixed plan: who it is, when it arrives, how long it stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorSpec {
    pub id:      ActorId,
    pub class:   Class,
    /// Offset from the start of the run at which the actor asks to enter.
    pub arrival: Duration,
    /// How long the actor holds its slot once admitted.
    pub service: Duration,
}

/// Draws a reproducible population from a global seed.
///
/// Every actor gets its own [`ActorRng`], so actor `i` has the same class and
/// service time no matter how many actors follow it.
pub struct PopulationBuilder {
    count:            usize,
    seed:             u64,
    class_a_ratio:    f64,
    service_ms:       (u64, u64),
    b_service_factor: f64,
    stagger_ms:       u64,
    alternating:      bool,
}

impl PopulationBuilder {
    /// A builder for `count` actors with the [`SimConfig`] defaults.
    pub fn new(count: usize, seed: u64) -> Self {
        let defaults = SimConfig::default();
        Self {
            count,
            seed,
            class_a_ratio:    defaults.class_a_ratio,
            service_ms:       defaults.service_ms,
            b_service_factor: defaults.b_service_factor,
            stagger_ms:       defaults.stagger_ms,
            alternating:      defaults.alternating,
        }
    }

    /// A builder carrying every population parameter of `config`.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            count:            config.actors,
            seed:             config.seed,
            class_a_ratio:    config.class_a_ratio,
            service_ms:       config.service_ms,
            b_service_factor: config.b_service_factor,
            stagger_ms:       config.stagger_ms,
            alternating:      config.alternating,
        }
    }

    pub fn class_a_ratio(mut self, p: f64) -> Self {
        self.class_a_ratio = p;
        self
    }

    /// Inclusive occupation time range in milliseconds.
    pub fn service_ms(mut self, min: u64, max: u64) -> Self {
        self.service_ms = (min, max);
        self
    }

    pub fn b_service_factor(mut self, factor: f64) -> Self {
        self.b_service_factor = factor;
        self
    }

    pub fn stagger_ms(mut self, ms: u64) -> Self {
        self.stagger_ms = ms;
        self
    }

    /// Assign classes A, B, A, B, … by index.
    pub fn alternating(mut self) -> Self {
        self.alternating = true;
        self
    }

    pub fn build(self) -> Vec<ActorSpec> {
        let (min, max) = self.service_ms;
        (0..self.count)
            .map(|i| {
                let id = ActorId(i as u32);
                let mut rng = ActorRng::new(self.seed, id);

                let class = if self.alternating {
                    Class::ALL[i % 2]
                } else if rng.gen_bool(self.class_a_ratio) {
                    Class::A
                } else {
                    Class::B
                };

                let mut service_ms = rng.gen_range(min..=max.max(min)) as f64;
                if class == Class::B {
                    service_ms *= self.b_service_factor;
                }

                ActorSpec {
                    id,
                    class,
                    arrival: Duration::from_millis(self.stagger_ms.saturating_mul(i as u64)),
                    service: Duration::from_millis(service_ms.round() as u64),
                }
            })
            .collect()
    }
}
