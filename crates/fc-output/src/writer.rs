//! The `OutputWriter` trait implemented by backend writers.

use crate::{ActorRow, OutputResult, RunSummaryRow};

/// Sink for the rows of one run.
///
/// Driven by [`SimOutputObserver`][crate::SimOutputObserver], which stores
/// the first error instead of returning it.
pub trait OutputWriter {
    /// Write a batch of per-actor rows.
    fn write_actors(&mut self, rows: &[ActorRow]) -> OutputResult<()>;

    /// Write the one summary row of a run.
    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
