//! Facility bookkeeping: occupancy, class gate, run length, handover flag.
//!
//! `FacilityState` is a plain value with no synchronisation of its own.  The
//! controller keeps exactly one behind its mutex, and every method here runs
//! inside that critical section.  Keeping the state machine free of locks
//! lets the tests drive it step by step.

use fc_core::{Class, FacilityConfig, TieBreak};

/// The single shared state of one facility.
#[derive(Debug, Clone)]
pub(crate) struct FacilityState {
    pub(crate) capacity:         u32,
    pub(crate) run_threshold:    u32,
    pub(crate) tie_break:        TieBreak,

    /// Slots currently in use.  Invariant: `occupied <= capacity`.
    pub(crate) occupied:         u32,

    /// Class inside the facility.  Invariant: `None` iff `occupied == 0`.
    pub(crate) active:           Option<Class>,

    /// Consecutive admissions of `active` since it took over the facility.
    pub(crate) run_length:       u32,

    /// Refuses `active` (and, on an empty facility, `last_departed`) until
    /// the opposite class has been admitted.
    pub(crate) handover_pending: bool,

    pub(crate) last_departed:    Option<Class>,

    /// Actors blocked in `request_entry`, indexed by `Class::index`.
    pub(crate) waiting:          [u32; 2],

    pub(crate) shut_down:        bool,

    /// Lifetime admissions per class.  Reporting only.
    pub(crate) admitted:         [u64; 2],

    /// Completed handovers.  Reporting only.
    pub(crate) handovers:        u64,
}

/// What one admission changed, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Admission {
    pub(crate) run_length:         u32,
    /// The facility was empty and this admission flipped the class gate.
    pub(crate) took_over:          bool,
    /// This admission completed a forced handover.
    pub(crate) handover_completed: bool,
    /// This admission armed a forced handover.
    pub(crate) handover_armed:     bool,
}

/// What one release changed, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Departure {
    pub(crate) emptied:          bool,
    pub(crate) handover_pending: bool,
}

impl FacilityState {
    /// An empty facility.  `config` must already be validated.
    pub(crate) fn new(config: &FacilityConfig) -> Self {
        Self {
            capacity:         config.capacity,
            run_threshold:    config.run_threshold,
            tie_break:        config.tie_break,
            occupied:         0,
            active:           None,
            run_length:       0,
            handover_pending: false,
            last_departed:    None,
            waiting:          [0; 2],
            shut_down:        false,
            admitted:         [0; 2],
            handovers:        0,
        }
    }

    #[inline]
    pub(crate) fn waiting_for(&self, class: Class) -> u32 {
        self.waiting[class.index()]
    }

    // ── Fairness engine ───────────────────────────────────────────────────

    /// Arm the handover if the running class has reached the threshold and
    /// the opposite class has someone waiting.  Returns `true` if this call
    /// armed it.
    fn arm_handover_if_due(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        if self.handover_pending
            || self.run_length < self.run_threshold
            || self.waiting_for(active.opposite()) == 0
        {
            return false;
        }
        self.handover_pending = true;
        true
    }

    // ── Wait coordinator bookkeeping ──────────────────────────────────────

    /// Count `class` as blocked in `request_entry`.  Returns `true` if the
    /// new waiter armed a handover against the running class.
    pub(crate) fn register_waiter(&mut self, class: Class) -> bool {
        self.waiting[class.index()] += 1;
        self.arm_handover_if_due()
    }

    /// Undo [`register_waiter`][Self::register_waiter], on both the admitted
    /// and the abandoned exit path.
    pub(crate) fn unregister_waiter(&mut self, class: Class) {
        let slot = &mut self.waiting[class.index()];
        assert!(*slot > 0, "waiting counter for class {class} would underflow");
        *slot -= 1;
    }

    // ── Occupancy tracker + class gate ────────────────────────────────────

    /// Admit one actor of `class`.  The caller has already checked
    /// [`admits`][Self::admits] and unregistered the waiter.
    pub(crate) fn admit(&mut self, class: Class) -> Admission {
        assert!(
            self.occupied < self.capacity,
            "admission of class {class} would exceed capacity {}",
            self.capacity,
        );

        let mut took_over = false;
        let mut handover_completed = false;
        match self.active {
            None => {
                if self.last_departed != Some(class) {
                    handover_completed = self.handover_pending;
                    self.handover_pending = false;
                }
                self.active = Some(class);
                self.run_length = 0;
                took_over = true;
            }
            Some(active) => assert_eq!(
                active, class,
                "class {class} admitted while class {active} occupies the facility",
            ),
        }

        self.occupied += 1;
        self.run_length += 1;
        self.admitted[class.index()] += 1;
        if handover_completed {
            self.handovers += 1;
        }
        let handover_armed = self.arm_handover_if_due();

        Admission {
            run_length: self.run_length,
            took_over,
            handover_completed,
            handover_armed,
        }
    }

    /// Free one slot held by `class`.
    ///
    /// # Panics
    ///
    /// Panics if the facility is empty or holds the other class: the caller
    /// released a slot it never acquired.
    pub(crate) fn depart(&mut self, class: Class) -> Departure {
        let Some(active) = self.active else {
            panic!("release of class {class} on an empty facility");
        };
        assert_eq!(
            active, class,
            "release of class {class} while class {active} occupies the facility",
        );

        self.occupied -= 1;
        if self.occupied > 0 {
            return Departure { emptied: false, handover_pending: self.handover_pending };
        }

        // The facility drained.  A run that reached the threshold keeps (or
        // arms, if the opposite class is waiting now) the handover; any
        // shorter run clears it.
        let run_complete = self.run_length >= self.run_threshold;
        self.handover_pending = run_complete
            && (self.handover_pending || self.waiting_for(class.opposite()) > 0);
        self.last_departed = Some(class);
        self.active = None;
        self.run_length = 0;

        Departure { emptied: true, handover_pending: self.handover_pending }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            capacity:         self.capacity,
            occupied:         self.occupied,
            active:           self.active,
            run_length:       self.run_length,
            run_threshold:    self.run_threshold,
            handover_pending: self.handover_pending,
            last_departed:    self.last_departed,
            waiting:          self.waiting,
            admitted:         self.admitted,
            handovers:        self.handovers,
            shut_down:        self.shut_down,
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// A copy of the facility state taken under the controller's lock.
///
/// For display only: by the time the caller looks at it the facility may
/// have moved on, so it must never feed an admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub capacity:         u32,
    pub occupied:         u32,
    pub active:           Option<Class>,
    pub run_length:       u32,
    pub run_threshold:    u32,
    pub handover_pending: bool,
    pub last_departed:    Option<Class>,
    pub waiting:          [u32; 2],
    pub admitted:         [u64; 2],
    pub handovers:        u64,
    pub shut_down:        bool,
}

impl Snapshot {
    /// Actors of `class` blocked in `request_entry`.
    #[inline]
    pub fn waiting(&self, class: Class) -> u32 {
        self.waiting[class.index()]
    }

    /// Lifetime admissions of `class`.
    #[inline]
    pub fn admitted(&self, class: Class) -> u64 {
        self.admitted[class.index()]
    }

    #[inline]
    pub fn free_slots(&self) -> u32 {
        self.capacity - self.occupied
    }

    /// `true` when nobody is inside and nobody is waiting.
    pub fn is_idle(&self) -> bool {
        self.occupied == 0 && self.waiting == [0, 0]
    }
}
