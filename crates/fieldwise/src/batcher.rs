mod job;
use job::Job;

use crate::handler::{Cancel, Delivery, Handler, Pending, Request};
use crate::{AsyncResolver, Entity, Error, FieldGraph, Result};

use fieldwise_core::short_type_name;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;

/// Coalesces concurrent requests for the same entity into one fetch.
///
/// Requests queue up until [`run`](Self::run) is called; the caller decides
/// when a batching window closes. Each flushed id is fetched once, with the
/// union of the graphs its requests asked for, and every request receives
/// its own copy narrowed to its own graph.
///
/// A cancelled request is withdrawn and reported at once, whether its window
/// has been flushed or not. A fetch in flight is aborted when every request
/// for it has been cancelled.
pub struct Batcher<E: Entity, R> {
    shared: Arc<Shared<E, R>>,
}

struct Shared<E: Entity, R> {
    resolver: R,
    jobs: Mutex<HashMap<E::Id, Arc<Job<E>>>>,
    next_key: AtomicU64,
}

impl<E, R> Batcher<E, R>
where
    E: Entity + Send + Sync + 'static,
    R: AsyncResolver<E> + 'static,
{
    pub fn new(resolver: R) -> Self {
        Batcher {
            shared: Arc::new(Shared {
                resolver,
                jobs: Mutex::new(HashMap::new()),
                next_key: AtomicU64::new(0),
            }),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.shared.resolver
    }

    /// Queues a request for `id` holding `graph`, reporting to `handler`.
    ///
    /// `on_pre_request` runs before this returns.
    pub fn submit(
        &self,
        id: E::Id,
        graph: &FieldGraph<E::Field>,
        handler: impl Handler<Option<E>> + 'static,
    ) -> Request {
        let request = self.next_request();
        self.enqueue(id, graph, request.clone(), Box::new(handler));
        request
    }

    /// Queues a request for `id` holding `graph`, resolving once the
    /// batch it lands in is flushed and fetched.
    pub fn get(&self, id: E::Id, graph: &FieldGraph<E::Field>) -> Pending<Option<E>> {
        let request = self.next_request();
        let (pending, complete) = Pending::channel(&request);
        self.enqueue(id, graph, request, Box::new(complete));
        pending
    }

    /// Closes the current window: every queued id with a surviving request
    /// is fetched once, on the current Tokio runtime.
    ///
    /// Returns the number of fetches started. Fails without touching the
    /// queue when called outside a Tokio runtime.
    pub fn run(&self) -> Result<usize> {
        let runtime = Handle::try_current().map_err(|_| {
            Error::invalid_configuration("Batcher::run must be called within a Tokio runtime")
        })?;

        let jobs = std::mem::take(&mut *self.shared.lock_jobs());
        let mut started = 0;

        for (id, job) in jobs {
            let Some((graph, mut waiters)) = job.dispatch() else {
                continue;
            };

            debug!(
                "fetching {}({id:?}) with {{{graph}}} for {} request(s)",
                short_type_name::<E>(),
                waiters.len()
            );

            for waiter in &mut waiters {
                waiter.dispatch();
            }

            if !job.restore(waiters) {
                continue;
            }

            let shared = self.shared.clone();
            let in_flight = job.clone();
            let task = runtime.spawn(async move {
                let result = shared.resolver.get(&id, &graph).await;
                in_flight.settle(result);
            });

            job.set_abort(task.abort_handle());
            started += 1;
        }

        Ok(started)
    }

    /// Number of ids the next [`run`](Self::run) would fetch.
    pub fn pending_jobs(&self) -> usize {
        self.shared
            .lock_jobs()
            .values()
            .filter(|job| job.is_pending())
            .count()
    }

    fn next_request(&self) -> Request {
        Request::detached(self.shared.next_key.fetch_add(1, Ordering::Relaxed))
    }

    fn enqueue(
        &self,
        id: E::Id,
        graph: &FieldGraph<E::Field>,
        request: Request,
        handler: Box<dyn Handler<Option<E>>>,
    ) {
        let delivery = Delivery::queue(handler, request.clone());

        let job = {
            let mut jobs = self.shared.lock_jobs();
            let job = jobs.entry(id).or_insert_with(|| Arc::new(Job::new()));

            // Every earlier request for this id was cancelled.
            if !job.is_open() {
                *job = Arc::new(Job::new());
            }

            job.push(request.key(), graph.clone(), delivery);
            job.clone()
        };

        let target: Weak<dyn Cancel> = Arc::downgrade(&job) as Weak<Job<E>>;
        request.attach(target);

        // Cancelled before it was attached, from `on_pre_request` or
        // another thread.
        if request.is_cancelled() {
            job.cancel(request.key());
        }
    }
}

impl<E: Entity, R> Shared<E, R> {
    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<E::Id, Arc<Job<E>>>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Entity, R> Clone for Batcher<E, R> {
    fn clone(&self) -> Self {
        Batcher {
            shared: self.shared.clone(),
        }
    }
}
