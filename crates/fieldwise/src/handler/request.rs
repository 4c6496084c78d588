use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, Weak};

const PENDING: u8 = 0;
const SETTLED: u8 = 1;
const CANCELLED: u8 = 2;

/// Work that can withdraw one of its waiters.
pub(crate) trait Cancel: Send + Sync {
    /// Withdraws the waiter registered under `key`. Returns `false` when the
    /// waiter is unknown or its work has already settled.
    fn cancel(&self, key: u64) -> bool;
}

/// Cancellation handle for one queued request.
///
/// Clones refer to the same request. Cancelling a request that has settled
/// is a no-op.
#[derive(Clone)]
pub struct Request {
    inner: Arc<Inner>,
}

struct Inner {
    key: u64,
    state: AtomicU8,
    work: OnceLock<Weak<dyn Cancel>>,
}

impl Request {
    /// A request not attached to any work yet.
    pub(crate) fn detached(key: u64) -> Request {
        Request {
            inner: Arc::new(Inner {
                key,
                state: AtomicU8::new(PENDING),
                work: OnceLock::new(),
            }),
        }
    }

    pub(crate) fn attach(&self, work: Weak<dyn Cancel>) {
        let _ = self.inner.work.set(work);
    }

    pub(crate) fn key(&self) -> u64 {
        self.inner.key
    }

    /// Cancels the request. Returns `true` if this call withdrew it.
    pub fn cancel(&self) -> bool {
        if self.inner.state.load(Ordering::Acquire) != PENDING {
            return false;
        }

        match self.inner.work.get() {
            Some(work) => match work.upgrade() {
                Some(work) => work.cancel(self.inner.key),
                None => false,
            },
            // Not queued yet; the submitter checks the flag before queuing.
            None => self.transition(CANCELLED),
        }
    }

    /// Returns `true` once the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Returns `true` once a result was delivered.
    pub fn is_settled(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == SETTLED
    }

    pub(crate) fn mark_settled(&self) {
        self.transition(SETTLED);
    }

    pub(crate) fn mark_cancelled(&self) {
        self.transition(CANCELLED);
    }

    fn transition(&self, to: u8) -> bool {
        self.inner
            .state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.state.load(Ordering::Acquire) {
            PENDING => "pending",
            SETTLED => "settled",
            _ => "cancelled",
        };

        f.debug_struct("Request")
            .field("key", &self.inner.key)
            .field("state", &state)
            .finish()
    }
}
