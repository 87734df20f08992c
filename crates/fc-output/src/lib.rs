//! `fc-output`: run output writers for the facility admission workspace.
//!
//! | Backend | Files created                      |
//! |---------|------------------------------------|
//! | CSV     | `actors.csv`, `run_summary.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `fc_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fc_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let report = sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{ActorRow, RunSummaryRow};
pub use writer::OutputWriter;
