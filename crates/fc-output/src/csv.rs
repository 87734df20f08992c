//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `actors.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{ActorRow, OutputResult, RunSummaryRow};
use crate::writer::OutputWriter;

/// Writes run output to two CSV files.
pub struct CsvWriter {
    actors:   Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut actors = Writer::from_path(dir.join("actors.csv"))?;
        actors.write_record([
            "actor_id", "class", "arrival_ms", "enter_ms", "leave_ms", "wait_ms", "service_ms",
        ])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record([
            "actors", "capacity", "run_threshold", "tie_break", "wall_ms", "average_wait_ms",
            "max_wait_a_ms", "max_wait_b_ms", "admitted_a", "admitted_b", "abandoned",
            "handovers", "utilization",
        ])?;

        Ok(Self {
            actors,
            summary,
            finished: false,
        })
    }
}

/// Empty cell for a missing value.
fn opt(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_actors(&mut self, rows: &[ActorRow]) -> OutputResult<()> {
        for row in rows {
            self.actors.write_record(&[
                row.actor_id.to_string(),
                row.class.to_string(),
                row.arrival_ms.to_string(),
                opt(row.enter_ms),
                opt(row.leave_ms),
                opt(row.wait_ms),
                row.service_ms.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.actors.to_string(),
            row.capacity.to_string(),
            row.run_threshold.to_string(),
            row.tie_break.to_string(),
            row.wall_ms.to_string(),
            format!("{:.3}", row.average_wait_ms),
            opt(row.max_wait_a_ms),
            opt(row.max_wait_b_ms),
            row.admitted_a.to_string(),
            row.admitted_b.to_string(),
            row.abandoned.to_string(),
            row.handovers.to_string(),
            format!("{:.4}", row.utilization),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.actors.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
