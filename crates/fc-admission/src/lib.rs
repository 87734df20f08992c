//! `fc-admission`: the admission controller for a two-class shared facility.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`state`]      | `FacilityState` bookkeeping, `Snapshot` read-only view          |
//! | [`predicate`]  | the admission predicate and the empty-facility tie-break        |
//! | [`controller`] | `AdmissionController`: mutex + condvar monitor, `Entry`        |
//!
//! # Admission model
//!
//! A facility has `capacity` interchangeable slots and admits one class at a
//! time.  An actor calls [`AdmissionController::request_entry`], which blocks
//! until the predicate admits it (or the facility shuts down), occupies a slot
//! for as long as it likes, then calls [`AdmissionController::release`].
//!
//! ```text
//!            request_entry(A)               release(A), occupied → 0
//!   EMPTY ───────────────────▶ OCCUPIED_A ─────────────────────────▶ EMPTY
//!     │  ◀────────────────────────────────────────────────────────────┘
//!     │      request_entry(B)               release(B), occupied → 0
//!     └─────────────────────▶ OCCUPIED_B ─────────────────────────▶ EMPTY
//!
//!   any state ── shutdown() ──▶ SHUTDOWN   (absorbing)
//! ```
//!
//! Fairness: once the active class has been admitted `run_threshold` times in
//! a row while the opposite class waits, a handover is armed.  The active
//! class is then refused until the facility drains and the opposite class has
//! been admitted.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fc_admission::{AdmissionController, Entry};
//! use fc_core::{Class, FacilityConfig};
//!
//! let facility = Arc::new(AdmissionController::new(FacilityConfig::new(4, 5))?);
//! if facility.request_entry(Class::A) == Entry::Admitted {
//!     occupy_slot();
//!     facility.release(Class::A);
//! }
//! ```

pub mod controller;
pub mod predicate;
pub mod state;

#[cfg(test)]
mod tests;

pub use controller::{AdmissionController, Entry};
pub use state::Snapshot;
