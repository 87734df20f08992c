//! The admission predicate.
//!
//! Evaluated under the controller's lock for one requester of class `c`:
//!
//! ```text
//! 1. occupied == capacity                        → deny
//! 2. facility empty:
//!      a. handover pending and c left last       → deny
//!      b. otherwise                              → tie-break (below)
//! 3. another class inside                        → deny
//! 4. c inside:
//!      a. handover pending                       → deny
//!      b. otherwise                              → admit
//! ```
//!
//! The tie-break only applies on an empty facility, with both classes
//! waiting and no handover pending.

use std::cmp::Ordering;

use fc_core::{Class, TieBreak};

use crate::state::FacilityState;

impl FacilityState {
    /// Would an actor of `class` be admitted right now?
    ///
    /// The requester is expected to be counted in `waiting` already.
    pub(crate) fn admits(&self, class: Class) -> bool {
        if self.occupied >= self.capacity {
            return false;
        }
        match self.active {
            None => {
                if self.handover_pending {
                    return self.last_departed != Some(class);
                }
                self.tie_break_allows(class)
            }
            Some(active) if active != class => false,
            Some(_) => !self.handover_pending,
        }
    }

    fn tie_break_allows(&self, class: Class) -> bool {
        let mine = self.waiting_for(class);
        let theirs = self.waiting_for(class.opposite());
        if mine == 0 || theirs == 0 {
            return true;
        }
        let not_last = self.last_departed != Some(class);
        match self.tie_break {
            TieBreak::FirstWoken => true,
            TieBreak::Alternate => not_last,
            TieBreak::MajorityWaiting => match mine.cmp(&theirs) {
                Ordering::Greater => true,
                Ordering::Less    => false,
                Ordering::Equal   => not_last,
            },
        }
    }

    /// Evaluate the predicate for a hypothetical requester of `class` without
    /// touching the real waiting counters.
    pub(crate) fn would_admit(&self, class: Class) -> bool {
        if self.shut_down {
            return false;
        }
        let mut probe = self.clone();
        probe.register_waiter(class);
        probe.admits(class)
    }
}
