use crate::handler::{Cancel, Delivery, Outcome};
use crate::{Entity, FieldGraph, Result};

use log::trace;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

/// All requests for one id queued within one batching window.
pub(super) struct Job<E: Entity> {
    inner: Mutex<Inner<E>>,
}

struct Inner<E: Entity> {
    waiters: Vec<Waiter<E>>,
    phase: Phase,
}

pub(super) struct Waiter<E: Entity> {
    key: u64,
    graph: FieldGraph<E::Field>,
    delivery: Delivery<Option<E>>,
}

enum Phase {
    /// Accepting waiters.
    Queued,

    /// The fetch is running; `live` lists the waiters still interested.
    InFlight {
        live: Vec<u64>,
        abort: Option<AbortHandle>,
    },

    /// Delivered, or cancelled by its last waiter.
    Settled,
}

impl<E: Entity> Job<E> {
    pub(super) fn new() -> Job<E> {
        Job {
            inner: Mutex::new(Inner {
                waiters: vec![],
                phase: Phase::Queued,
            }),
        }
    }

    /// Returns `true` while the job accepts waiters.
    pub(super) fn is_open(&self) -> bool {
        matches!(self.lock().phase, Phase::Queued)
    }

    /// Returns `true` if the job would issue a fetch when flushed.
    pub(super) fn is_pending(&self) -> bool {
        let inner = self.lock();
        matches!(inner.phase, Phase::Queued) && !inner.waiters.is_empty()
    }

    pub(super) fn push(
        &self,
        key: u64,
        graph: FieldGraph<E::Field>,
        delivery: Delivery<Option<E>>,
    ) {
        self.lock().waiters.push(Waiter {
            key,
            graph,
            delivery,
        });
    }

    /// Moves the job in flight, handing out its waiters together with the
    /// union of their graphs. `None` when no waiter is left.
    ///
    /// The waiters must be handed back through [`restore`](Self::restore)
    /// before the fetch starts.
    pub(super) fn dispatch(&self) -> Option<(FieldGraph<E::Field>, Vec<Waiter<E>>)> {
        let mut inner = self.lock();

        if !matches!(inner.phase, Phase::Queued) || inner.waiters.is_empty() {
            inner.phase = Phase::Settled;
            return None;
        }

        let waiters = std::mem::take(&mut inner.waiters);

        let mut graph = FieldGraph::builder();
        for waiter in &waiters {
            graph.merge(&waiter.graph);
        }

        inner.phase = Phase::InFlight {
            live: waiters.iter().map(|waiter| waiter.key).collect(),
            abort: None,
        };

        Some((graph.build(), waiters))
    }

    /// Takes back the waiters handed out by [`dispatch`](Self::dispatch).
    ///
    /// Waiters cancelled in the meantime are reported right away. Returns
    /// `false` when none is left, in which case the fetch must not start.
    pub(super) fn restore(&self, waiters: Vec<Waiter<E>>) -> bool {
        let mut withdrawn = vec![];

        let running = {
            let mut guard = self.lock();
            let inner = &mut *guard;

            match &inner.phase {
                Phase::InFlight { live, .. } => {
                    for waiter in waiters {
                        if live.contains(&waiter.key) {
                            inner.waiters.push(waiter);
                        } else {
                            withdrawn.push(waiter);
                        }
                    }
                    true
                }
                _ => {
                    withdrawn = waiters;
                    false
                }
            }
        };

        for waiter in withdrawn {
            waiter.delivery.settle(Outcome::Cancelled);
        }

        running
    }

    /// Records the handle used to abort the fetch once every waiter has
    /// cancelled. Aborts right away if that already happened.
    pub(super) fn set_abort(&self, handle: AbortHandle) {
        let mut inner = self.lock();

        match &mut inner.phase {
            Phase::InFlight { abort, .. } => *abort = Some(handle),
            _ => handle.abort(),
        }
    }

    /// Fans the fetch result out to every remaining waiter, each receiving
    /// its own copy narrowed to the graph it asked for.
    pub(super) fn settle(&self, result: Result<Option<E>>) {
        let waiters = {
            let mut inner = self.lock();
            inner.phase = Phase::Settled;
            std::mem::take(&mut inner.waiters)
        };

        for waiter in waiters {
            let outcome = match &result {
                Ok(Some(value)) => match narrow(value, &waiter.graph) {
                    Ok(value) => Outcome::Success(Some(value)),
                    Err(err) => Outcome::Failed(err),
                },
                Ok(None) => Outcome::Success(None),
                Err(err) => Outcome::Failed(err.clone()),
            };

            trace!("delivering request {} ({})", waiter.key, outcome_name(&outcome));
            waiter.delivery.settle(outcome);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Entity + Send + 'static> Cancel for Job<E> {
    fn cancel(&self, key: u64) -> bool {
        let mut guard = self.lock();
        let inner = &mut *guard;

        let waiter = match &mut inner.phase {
            Phase::Queued => {
                let Some(index) = inner.waiters.iter().position(|waiter| waiter.key == key) else {
                    return false;
                };

                let waiter = inner.waiters.remove(index);
                if inner.waiters.is_empty() {
                    inner.phase = Phase::Settled;
                }
                Some(waiter)
            }
            Phase::InFlight { live, abort } => {
                let Some(index) = live.iter().position(|live| *live == key) else {
                    return false;
                };
                live.remove(index);

                if live.is_empty() {
                    if let Some(abort) = abort.take() {
                        abort.abort();
                    }
                    inner.phase = Phase::Settled;
                }

                // Absent while `run` is still dispatching; `restore` reports it.
                inner
                    .waiters
                    .iter()
                    .position(|waiter| waiter.key == key)
                    .map(|index| inner.waiters.remove(index))
            }
            Phase::Settled => return false,
        };

        // Handlers run without the job lock held.
        drop(guard);
        if let Some(waiter) = waiter {
            waiter.delivery.settle(Outcome::Cancelled);
        }
        true
    }
}

fn narrow<E: Entity>(value: &E, graph: &FieldGraph<E::Field>) -> Result<E> {
    let mut value = value.clone_all()?;
    value.intersect(graph)?;
    Ok(value)
}

fn outcome_name<T>(outcome: &Outcome<T>) -> &'static str {
    match outcome {
        Outcome::Success(_) => "success",
        Outcome::Failed(_) => "failed",
        Outcome::Cancelled => "cancelled",
    }
}

impl<E: Entity> Waiter<E> {
    pub(super) fn dispatch(&mut self) {
        self.delivery.dispatch();
    }
}
