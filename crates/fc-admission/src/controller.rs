//! `AdmissionController`: the monitor guarding one facility.
//!
//! One `parking_lot::Mutex` holds the whole [`FacilityState`]; one `Condvar`
//! carries wakeups.  `request_entry` re-checks the predicate and suspends in
//! a single `Condvar::wait`, which releases and re-acquires the mutex
//! atomically, so a wakeup can never slip in between the check and the
//! suspend.  Every state change ends with `notify_all` while the lock is
//! still held: any subset of waiters of either class may have become
//! admissible, and a single wakeup could pick the wrong one.

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace};

use fc_core::{Class, FacilityConfig, FcResult};

use crate::state::{FacilityState, Snapshot};

/// Outcome of [`AdmissionController::request_entry`].
#[must_use = "an abandoned request must not occupy a slot"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// The caller holds one slot and must call `release` exactly once.
    Admitted,
    /// The facility shut down before the caller was admitted.  The caller
    /// holds nothing and must not call `release`.
    Abandoned,
}

impl Entry {
    #[inline]
    pub fn is_admitted(self) -> bool {
        matches!(self, Entry::Admitted)
    }
}

/// Decides, for every requesting actor, whether it may occupy a slot.
///
/// Share one controller between all actors with `Arc<AdmissionController>`.
///
/// # Contract
///
/// Callers must call [`release`][Self::release] exactly once for every
/// [`Entry::Admitted`], with the same class, and never otherwise.  Breaking
/// that contract is a bug in the caller and panics.
pub struct AdmissionController {
    config: FacilityConfig,
    state:  Mutex<FacilityState>,
    wake:   Condvar,
}

impl AdmissionController {
    /// Build a controller for an empty facility.
    ///
    /// Fails with `FcError::Config` if `config` has zero capacity or a zero
    /// run threshold.
    pub fn new(config: FacilityConfig) -> FcResult<Self> {
        config.validate()?;
        info!(
            capacity = config.capacity,
            run_threshold = config.run_threshold,
            tie_break = %config.tie_break,
            "facility open",
        );
        Ok(Self {
            state: Mutex::new(FacilityState::new(&config)),
            wake:  Condvar::new(),
            config,
        })
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    // ── Entry points ──────────────────────────────────────────────────────

    /// Block until an actor of `class` may occupy a slot, then occupy it.
    ///
    /// Returns [`Entry::Abandoned`] if the facility is (or becomes) shut
    /// down before admission.
    pub fn request_entry(&self, class: Class) -> Entry {
        let mut state = self.state.lock();
        if state.shut_down {
            return Entry::Abandoned;
        }

        if state.register_waiter(class) {
            info!(
                running = %class.opposite(),
                run_length = state.run_length,
                "handover armed by arriving waiter",
            );
        }
        // A new waiter can only close the gate for the other class.  Any
        // same-class waiter it unblocks is matched by this thread's own
        // evaluation below, which wakes everyone on admission.

        loop {
            if state.shut_down {
                state.unregister_waiter(class);
                debug!(class = %class, "request abandoned at shutdown");
                self.wake.notify_all();
                return Entry::Abandoned;
            }
            if state.admits(class) {
                break;
            }
            trace!(class = %class, occupied = state.occupied, "waiting");
            self.wake.wait(&mut state);
        }

        state.unregister_waiter(class);
        let admission = state.admit(class);

        if admission.handover_completed {
            info!(class = %class, "handover complete");
        }
        debug!(
            class = %class,
            occupied = state.occupied,
            capacity = state.capacity,
            run_length = admission.run_length,
            run_threshold = state.run_threshold,
            waiting_a = state.waiting_for(Class::A),
            waiting_b = state.waiting_for(Class::B),
            took_over = admission.took_over,
            "admitted",
        );
        if admission.handover_armed {
            info!(
                class = %class,
                run_length = admission.run_length,
                "run threshold reached, handover armed",
            );
        }

        self.wake.notify_all();
        Entry::Admitted
    }

    /// Give back one slot held by an actor of `class` and wake every waiter.
    ///
    /// Allowed after [`shutdown`][Self::shutdown]: actors already inside still
    /// have to leave.
    ///
    /// # Panics
    ///
    /// Panics if no actor of `class` is inside the facility.
    pub fn release(&self, class: Class) {
        let mut state = self.state.lock();
        let departure = state.depart(class);
        debug!(
            class = %class,
            occupied = state.occupied,
            capacity = state.capacity,
            emptied = departure.emptied,
            handover_pending = departure.handover_pending,
            "released",
        );
        self.wake.notify_all();
    }

    /// Stop admitting.  Every blocked requester returns [`Entry::Abandoned`]
    /// within one wake cycle; later requests are abandoned immediately.
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        info!(
            occupied = state.occupied,
            waiting_a = state.waiting_for(Class::A),
            waiting_b = state.waiting_for(Class::B),
            "facility shutting down",
        );
        self.wake.notify_all();
    }

    // ── Read-only views ───────────────────────────────────────────────────

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().shut_down
    }

    /// Would an actor of `class` be admitted if it asked right now?
    ///
    /// Does not register a waiter or change any state.  The answer is stale
    /// as soon as the lock is released.
    pub fn would_admit(&self, class: Class) -> bool {
        self.state.lock().would_admit(class)
    }

    /// Copy of the current state, for display.
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().snapshot()
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("config", &self.config)
            .field("state", &self.snapshot())
            .finish()
    }
}
