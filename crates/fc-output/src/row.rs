//! Plain data row types written by output backends.

use fc_core::{Class, TieBreak};
use fc_sim::{ActorRecord, RunReport};

/// What happened to one actor.  Times are milliseconds since the run started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRow {
    pub actor_id:   u32,
    pub class:      Class,
    pub arrival_ms: u64,
    /// `None` if the actor was abandoned at shutdown.
    pub enter_ms:   Option<u64>,
    pub leave_ms:   Option<u64>,
    pub wait_ms:    Option<u64>,
    /// Planned occupation time.
    pub service_ms: u64,
}

/// Aggregate statistics of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub actors:          u64,
    pub capacity:        u32,
    pub run_threshold:   u32,
    pub tie_break:       TieBreak,
    pub wall_ms:         u64,
    pub average_wait_ms: f64,
    pub max_wait_a_ms:   Option<u64>,
    pub max_wait_b_ms:   Option<u64>,
    pub admitted_a:      u64,
    pub admitted_b:      u64,
    pub abandoned:       u64,
    pub handovers:       u64,
    pub utilization:     f64,
}

// ── Conversions from the run report ───────────────────────────────────────────

fn millis(d: std::time::Duration) -> u64 {
    d.as_millis() as u64
}

impl From<&ActorRecord> for ActorRow {
    fn from(r: &ActorRecord) -> Self {
        ActorRow {
            actor_id:   r.id.0,
            class:      r.class,
            arrival_ms: millis(r.arrival),
            enter_ms:   r.enter.map(millis),
            leave_ms:   r.leave.map(millis),
            wait_ms:    r.wait().map(millis),
            service_ms: millis(r.service),
        }
    }
}

impl From<&RunReport> for RunSummaryRow {
    fn from(r: &RunReport) -> Self {
        RunSummaryRow {
            actors:          r.records.len() as u64,
            capacity:        r.facility.capacity,
            run_threshold:   r.facility.run_threshold,
            tie_break:       r.facility.tie_break,
            wall_ms:         millis(r.wall),
            average_wait_ms: r.average_wait().as_secs_f64() * 1000.0,
            max_wait_a_ms:   r.max_wait(Class::A).map(millis),
            max_wait_b_ms:   r.max_wait(Class::B).map(millis),
            admitted_a:      r.admitted(Class::A) as u64,
            admitted_b:      r.admitted(Class::B) as u64,
            abandoned:       r.abandoned() as u64,
            handovers:       r.handovers,
            utilization:     r.utilization(),
        }
    }
}
