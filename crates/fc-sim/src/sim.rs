//! The `Sim` struct and its actor threads.

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use fc_admission::{AdmissionController, Entry};
use fc_core::ActorId;
use tracing::{debug, info, warn};

use crate::{ActorRecord, ActorSpec, RunReport, SimConfig, SimError, SimObserver, SimResult};

// ── Events posted by actor threads ────────────────────────────────────────────

/// One actor transition, timestamped as an offset from the start of the run.
/// `slot` is the actor's position in the population.
enum Event {
    Admitted  { slot: usize, arrived: Duration, at: Duration },
    Released  { slot: usize, at: Duration },
    Abandoned { slot: usize, arrived: Duration, at: Duration },
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The threaded simulation runner.
///
/// Every actor of the population gets its own OS thread, because
/// [`AdmissionController::request_entry`] blocks the caller.  Each thread:
///
/// 1. sleeps until its arrival offset,
/// 2. requests entry for its class (blocking),
/// 3. holds the slot for its service time,
/// 4. releases the slot.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    /// The actors of this run, in spawn order.
    pub population: Vec<ActorSpec>,

    /// The controller shared by every actor thread.
    pub facility: Arc<AdmissionController>,
}

/// Cloneable handle that shuts the facility down from another thread.
///
/// Actors still waiting (or not yet arrived) give up; actors inside finish
/// their occupation and leave normally.
#[derive(Clone, Debug)]
pub struct ShutdownHandle(Arc<AdmissionController>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.shutdown();
    }
}

impl Sim {
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.facility))
    }

    /// Spawn every actor, wait for all of them to finish, and report.
    ///
    /// Observer hooks run on the calling thread.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        let mut records: Vec<ActorRecord> = self
            .population
            .iter()
            .map(|a| ActorRecord {
                id:      a.id,
                class:   a.class,
                service: a.service,
                arrival: a.arrival,
                enter:   None,
                leave:   None,
            })
            .collect();

        let handovers_before = self.facility.snapshot().handovers;
        info!(
            actors = self.population.len(),
            capacity = self.facility.config().capacity,
            run_threshold = self.facility.config().run_threshold,
            "run started",
        );

        let start = Instant::now();
        let (tx, rx) = mpsc::channel::<Event>();
        let facility: &AdmissionController = &self.facility;
        let population = &self.population;

        let panicked = thread::scope(|s| {
            let handles: Vec<(ActorId, _)> = population
                .iter()
                .enumerate()
                .map(|(slot, &actor)| {
                    let tx = tx.clone();
                    let handle = s.spawn(move || run_actor(facility, slot, actor, start, &tx));
                    (actor.id, handle)
                })
                .collect();
            drop(tx);

            // Ends once every actor thread has dropped its sender.
            for event in rx {
                match event {
                    Event::Admitted { slot, arrived, at } => {
                        let r = &mut records[slot];
                        r.arrival = arrived;
                        r.enter = Some(at);
                        observer.on_admitted(r.id, r.class, at.saturating_sub(arrived));
                    }
                    Event::Released { slot, at } => {
                        let r = &mut records[slot];
                        r.leave = Some(at);
                        let held = r.occupation().unwrap_or_default();
                        observer.on_released(r.id, r.class, held);
                    }
                    Event::Abandoned { slot, arrived, at } => {
                        let r = &mut records[slot];
                        r.arrival = arrived;
                        observer.on_abandoned(r.id, r.class, at.saturating_sub(arrived));
                    }
                }
            }

            let mut panicked = None;
            for (id, handle) in handles {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(id);
                }
            }
            panicked
        });

        if let Some(id) = panicked {
            warn!(actor = %id, "actor thread panicked");
            return Err(SimError::ActorPanicked(id));
        }

        let report = RunReport {
            facility:  self.facility.config().clone(),
            records,
            wall:      start.elapsed(),
            handovers: self.facility.snapshot().handovers - handovers_before,
        };
        observer.on_sim_end(&report);
        Ok(report)
    }
}

/// Body of one actor thread.
fn run_actor(
    facility: &AdmissionController,
    slot:     usize,
    actor:    ActorSpec,
    start:    Instant,
    events:   &Sender<Event>,
) {
    if let Some(delay) = actor.arrival.checked_sub(start.elapsed()) {
        thread::sleep(delay);
    }
    let arrived = start.elapsed();
    debug!(actor = %actor.id, class = %actor.class, "arrived");

    // Sends fail only while the run thread is unwinding.
    match facility.request_entry(actor.class) {
        Entry::Abandoned => {
            let _ = events.send(Event::Abandoned { slot, arrived, at: start.elapsed() });
        }
        Entry::Admitted => {
            let _ = events.send(Event::Admitted { slot, arrived, at: start.elapsed() });
            thread::sleep(actor.service);
            let at = start.elapsed();
            facility.release(actor.class);
            let _ = events.send(Event::Released { slot, at });
        }
    }
}
