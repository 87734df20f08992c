//! Facility configuration.
//!
//! Supplied once at startup, before any actor is admitted, and immutable
//! afterwards.  Applications build it from CLI flags or a JSON file (with the
//! `serde` feature) and hand it to `AdmissionController::new`, which calls
//! [`FacilityConfig::validate`].

use std::str::FromStr;

use crate::{FcError, FcResult};

/// Slot count used when the configuration source does not supply one.
pub const DEFAULT_CAPACITY: u32 = 4;

/// Run-length threshold used when the configuration source does not supply one.
pub const DEFAULT_RUN_THRESHOLD: u32 = 5;

// ── TieBreak ──────────────────────────────────────────────────────────────────

/// Which class gets an empty facility when both classes are waiting and no
/// handover is pending.
///
/// A pending handover always takes precedence over the tie-break.  Every
/// policy only narrows who may enter an empty facility, so none of them can
/// break mutual exclusion or the run-length bound.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreak {
    /// Whichever waiter re-evaluates first after the wake enters.
    FirstWoken,
    /// The class with more waiters enters; on a tie, the class that did not
    /// leave last enters.
    #[default]
    MajorityWaiting,
    /// The class that did not leave last enters.
    Alternate,
}

impl TieBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            TieBreak::FirstWoken      => "first-woken",
            TieBreak::MajorityWaiting => "majority",
            TieBreak::Alternate       => "alternate",
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = FcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-woken" | "first_woken" | "fifo" => Ok(TieBreak::FirstWoken),
            "majority" | "majority-waiting" | "majority_waiting" => Ok(TieBreak::MajorityWaiting),
            "alternate" => Ok(TieBreak::Alternate),
            other => Err(FcError::Parse(format!(
                "unknown tie-break {other:?} (expected first-woken, majority or alternate)"
            ))),
        }
    }
}

// ── FacilityConfig ────────────────────────────────────────────────────────────

/// Fixed parameters of one facility.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FacilityConfig {
    /// Total interchangeable slots.  Must be > 0.
    pub capacity: u32,

    /// Consecutive admissions of one class after which a handover is forced
    /// (if the opposite class is waiting).  Must be > 0.
    pub run_threshold: u32,

    /// Empty-facility tie-break between waiting classes.
    pub tie_break: TieBreak,
}

impl FacilityConfig {
    pub fn new(capacity: u32, run_threshold: u32) -> Self {
        Self {
            capacity,
            run_threshold,
            tie_break: TieBreak::default(),
        }
    }

    /// Replace the tie-break policy.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Reject configurations no facility can run with.
    pub fn validate(&self) -> FcResult<()> {
        if self.capacity == 0 {
            return Err(FcError::Config("capacity must be at least 1".into()));
        }
        if self.run_threshold == 0 {
            return Err(FcError::Config("run threshold must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_RUN_THRESHOLD)
    }
}
