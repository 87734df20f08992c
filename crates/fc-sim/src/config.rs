//! Run parameters for the threaded driver.

use crate::{SimError, SimResult};

/// How one simulated population arrives at and uses the facility.
///
/// Durations are whole milliseconds so the struct reads naturally from a
/// JSON file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Number of actors, one thread each.
    pub actors: usize,

    /// Global RNG seed.  Same seed and config → same population.
    pub seed: u64,

    /// Inclusive `(min, max)` occupation time in milliseconds.
    pub service_ms: (u64, u64),

    /// Probability that an actor belongs to class A.  Ignored when
    /// `alternating` is set.
    pub class_a_ratio: f64,

    /// Occupation time multiplier applied to class B actors.
    pub b_service_factor: f64,

    /// Delay between consecutive actor arrivals, in milliseconds.
    pub stagger_ms: u64,

    /// Assign classes A, B, A, B, … by actor index instead of drawing them.
    pub alternating: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            actors:           10,
            seed:             42,
            service_ms:       (100, 400),
            class_a_ratio:    0.5,
            b_service_factor: 1.0,
            stagger_ms:       20,
            alternating:      false,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.actors == 0 {
            return Err(SimError::Config("actor count must be at least 1".into()));
        }
        let (min, max) = self.service_ms;
        if min > max {
            return Err(SimError::Config(format!(
                "service time range is empty: min {min} ms > max {max} ms"
            )));
        }
        if !(0.0..=1.0).contains(&self.class_a_ratio) {
            return Err(SimError::Config(format!(
                "class A ratio {} is outside [0, 1]",
                self.class_a_ratio
            )));
        }
        if !self.b_service_factor.is_finite() || self.b_service_factor <= 0.0 {
            return Err(SimError::Config(format!(
                "class B service factor {} must be positive",
                self.b_service_factor
            )));
        }
        Ok(())
    }
}
