//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use fc_sim::{RunReport, SimObserver};

use crate::row::{ActorRow, RunSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes the per-actor rows and the run summary to
/// any [`OutputWriter`] backend once the run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        let rows: Vec<ActorRow> = report.records.iter().map(ActorRow::from).collect();
        if !rows.is_empty() {
            self.writer.write_actors(&rows)?;
        }
        self.writer.write_summary(&RunSummaryRow::from(report))
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_sim_end(&mut self, report: &RunReport) {
        let result = self.write_report(report);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
