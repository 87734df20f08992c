//! Simulation observer trait for progress reporting and data collection.

use std::time::Duration;

use fc_core::{ActorId, Class};
use tracing::info;

use crate::RunReport;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as actors come and go.
///
/// Actor threads never call the observer themselves.  They post events to the
/// thread that called `run`, which invokes these hooks one at a time in the
/// order the events arrived, so implementors need no synchronisation.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: wait-time printer
///
/// ```rust,ignore
/// struct SlowEntries { limit: Duration }
///
/// impl SimObserver for SlowEntries {
///     fn on_admitted(&mut self, actor: ActorId, class: Class, waited: Duration) {
///         if waited > self.limit {
///             println!("{actor} ({class}) waited {waited:?}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// An actor was admitted after waiting `waited` since its arrival.
    fn on_admitted(&mut self, _actor: ActorId, _class: Class, _waited: Duration) {}

    /// An actor released its slot after holding it for `held`.
    fn on_released(&mut self, _actor: ActorId, _class: Class, _held: Duration) {}

    /// An actor gave up because the facility shut down.
    fn on_abandoned(&mut self, _actor: ActorId, _class: Class, _waited: Duration) {}

    /// Called once after every actor thread has finished.
    fn on_sim_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Emits one `tracing` event per actor transition.
pub struct LogObserver;

impl SimObserver for LogObserver {
    fn on_admitted(&mut self, actor: ActorId, class: Class, waited: Duration) {
        info!(%actor, %class, waited_ms = waited.as_millis() as u64, "entered");
    }

    fn on_released(&mut self, actor: ActorId, class: Class, held: Duration) {
        info!(%actor, %class, held_ms = held.as_millis() as u64, "left");
    }

    fn on_abandoned(&mut self, actor: ActorId, class: Class, waited: Duration) {
        info!(%actor, %class, waited_ms = waited.as_millis() as u64, "gave up at shutdown");
    }

    fn on_sim_end(&mut self, report: &RunReport) {
        info!(
            actors = report.records.len(),
            wall_ms = report.wall.as_millis() as u64,
            handovers = report.handovers,
            "run finished",
        );
    }
}

/// Fan every hook out to two observers, first `.0` then `.1`.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_admitted(&mut self, actor: ActorId, class: Class, waited: Duration) {
        self.0.on_admitted(actor, class, waited);
        self.1.on_admitted(actor, class, waited);
    }

    fn on_released(&mut self, actor: ActorId, class: Class, held: Duration) {
        self.0.on_released(actor, class, held);
        self.1.on_released(actor, class, held);
    }

    fn on_abandoned(&mut self, actor: ActorId, class: Class, waited: Duration) {
        self.0.on_abandoned(actor, class, waited);
        self.1.on_abandoned(actor, class, waited);
    }

    fn on_sim_end(&mut self, report: &RunReport) {
        self.0.on_sim_end(report);
        self.1.on_sim_end(report);
    }
}
