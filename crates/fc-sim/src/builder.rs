//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use fc_admission::AdmissionController;
use fc_core::FacilityConfig;

use crate::{ActorSpec, PopulationBuilder, Sim, SimConfig, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: actor count, seed, service range, …
/// - [`FacilityConfig`]: capacity, run threshold, tie-break
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                       |
/// |-------------------|-----------------------------------------------|
/// | `.population(v)`  | `PopulationBuilder::from_config(&config)`     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default(), FacilityConfig::new(4, 5))
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    facility:   FacilityConfig,
    population: Option<Vec<ActorSpec>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, facility: FacilityConfig) -> Self {
        Self {
            config,
            facility,
            population: None,
        }
    }

    /// Supply a hand-made population (must be length `config.actors`).
    ///
    /// If not called, the population is drawn from the config's seed and
    /// distribution parameters.
    pub fn population(mut self, actors: Vec<ActorSpec>) -> Self {
        self.population = Some(actors);
        self
    }

    /// Validate inputs, open the facility, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let population = match self.population {
            Some(p) => {
                if p.len() != self.config.actors {
                    return Err(SimError::PopulationMismatch {
                        expected: self.config.actors,
                        got:      p.len(),
                    });
                }
                p
            }
            None => PopulationBuilder::from_config(&self.config).build(),
        };

        let controller = AdmissionController::new(self.facility)?;

        Ok(Sim {
            config:     self.config,
            population,
            facility:   Arc::new(controller),
        })
    }
}
