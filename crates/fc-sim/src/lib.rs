//! `fc-sim`: threaded actor driver for the facility admission controller.
//!
//! # Actor life cycle
//!
//! ```text
//! for each ActorSpec (one OS thread each):
//!   ① Arrive    sleep until `arrival` (actor index × stagger).
//!   ② Request   AdmissionController::request_entry(class), blocking.
//!   ③ Occupy    hold the slot for `service`.
//!   ④ Release   AdmissionController::release(class).
//! ```
//!
//! Actor threads post their transitions to the thread that called
//! [`Sim::run`], which feeds them to a [`SimObserver`] and assembles the
//! [`RunReport`] (waits, utilization, handovers).
//!
//! # Cargo features
//!
//! | Feature | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `SimConfig` (JSON configs). |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fc_core::FacilityConfig;
//! use fc_sim::{NoopObserver, SimBuilder, SimConfig};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), FacilityConfig::new(4, 5))
//!     .build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! println!("average wait {:?}", report.average_wait());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod population;
pub mod report;
pub mod sim;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{LogObserver, NoopObserver, SimObserver};
pub use population::{ActorSpec, PopulationBuilder};
pub use report::{ActorRecord, RunReport};
pub use sim::{ShutdownHandle, Sim};
