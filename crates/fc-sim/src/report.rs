//! Per-actor timing records and the aggregate statistics of one run.

use std::time::Duration;

use fc_core::{ActorId, Class, FacilityConfig};

/// What happened to one actor, as offsets from the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRecord {
    pub id:      ActorId,
    pub class:   Class,
    /// Planned occupation time.
    pub service: Duration,
    /// When the actor asked to enter.
    pub arrival: Duration,
    /// When the actor was admitted; `None` if it was abandoned.
    pub enter:   Option<Duration>,
    /// When the actor released its slot; `None` if it was abandoned.
    pub leave:   Option<Duration>,
}

impl ActorRecord {
    /// Time spent blocked before admission.
    pub fn wait(&self) -> Option<Duration> {
        self.enter.map(|t| t.saturating_sub(self.arrival))
    }

    /// Time actually spent holding a slot.
    pub fn occupation(&self) -> Option<Duration> {
        match (self.enter, self.leave) {
            (Some(enter), Some(leave)) => Some(leave.saturating_sub(enter)),
            _ => None,
        }
    }

    pub fn was_admitted(&self) -> bool {
        self.enter.is_some()
    }
}

/// Result of [`Sim::run`][crate::Sim::run].
#[derive(Debug, Clone)]
pub struct RunReport {
    pub facility:  FacilityConfig,
    /// One record per actor, in population order.
    pub records:   Vec<ActorRecord>,
    /// Wall time from the start of the run to the last actor finishing.
    pub wall:      Duration,
    /// Forced handovers the controller completed during the run.
    pub handovers: u64,
}

impl RunReport {
    fn admitted_records(&self) -> impl Iterator<Item = &ActorRecord> {
        self.records.iter().filter(|r| r.was_admitted())
    }

    pub fn admitted(&self, class: Class) -> usize {
        self.admitted_records().filter(|r| r.class == class).count()
    }

    pub fn abandoned(&self) -> usize {
        self.records.iter().filter(|r| !r.was_admitted()).count()
    }

    /// Mean wait over admitted actors; zero if nobody was admitted.
    pub fn average_wait(&self) -> Duration {
        let waits: Vec<Duration> = self.admitted_records().filter_map(ActorRecord::wait).collect();
        if waits.is_empty() {
            return Duration::ZERO;
        }
        waits.iter().sum::<Duration>() / u32::try_from(waits.len()).unwrap_or(u32::MAX)
    }

    /// Longest wait of any admitted actor of `class`.
    pub fn max_wait(&self, class: Class) -> Option<Duration> {
        self.admitted_records()
            .filter(|r| r.class == class)
            .filter_map(ActorRecord::wait)
            .max()
    }

    /// Total slot-time used.
    pub fn total_occupation(&self) -> Duration {
        self.records.iter().filter_map(ActorRecord::occupation).sum()
    }

    /// Fraction of available slot-time that was occupied:
    /// `Σ occupation / (wall × capacity)`.
    pub fn utilization(&self) -> f64 {
        let available = self.wall.as_secs_f64() * self.facility.capacity as f64;
        if available <= 0.0 {
            return 0.0;
        }
        self.total_occupation().as_secs_f64() / available
    }
}
