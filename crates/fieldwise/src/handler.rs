//! Callback lifecycle of asynchronous requests.
//!
//! Every handler sees exactly one of two sequences:
//!
//! ```text
//! pre_request -> post_request -> (success | fail) -> finish -> destroy
//! pre_request [-> post_request] -> cancel -> destroy
//! ```
//!
//! `post_request` precedes `cancel` only when the request was cancelled
//! after its work had been dispatched.

mod pending;
pub use pending::Pending;

mod request;
pub use request::Request;
pub(crate) use request::Cancel;

use crate::Error;

use log::{debug, trace};

/// Receives the result of an asynchronous request.
pub trait Handler<T>: Send {
    /// Called when the request is queued.
    fn on_pre_request(&mut self, request: &Request) {
        let _ = request;
    }

    /// Called when the work backing the request is dispatched.
    fn on_post_request(&mut self, request: &Request) {
        let _ = request;
    }

    fn on_success(&mut self, value: T);

    fn on_fail(&mut self, error: &Error) {
        let _ = error;
    }

    fn on_cancel(&mut self) {}

    /// Called after `on_success` or `on_fail`, never after `on_cancel`.
    fn on_finish(&mut self) {}

    /// Always the last callback.
    fn on_destroy(&mut self) {}
}

/// Closures receive the terminal outcome.
impl<T, F> Handler<T> for F
where
    F: FnMut(Outcome<T>) + Send,
{
    fn on_success(&mut self, value: T) {
        self(Outcome::Success(value))
    }

    fn on_fail(&mut self, error: &Error) {
        self(Outcome::Failed(error.clone()))
    }

    fn on_cancel(&mut self) {
        self(Outcome::Cancelled)
    }
}

/// How a request ended.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failed(Error),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The value, if the request succeeded.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The error, if the request failed.
    pub fn failure(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failed(error) => Outcome::Failed(error),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Queued,
    Dispatched,
    Settled,
}

/// Drives one handler through its lifecycle.
///
/// Dropping an unsettled delivery cancels it, so work that is aborted
/// midway still reports `cancel` and `destroy`.
pub(crate) struct Delivery<T> {
    handler: Box<dyn Handler<T>>,
    request: Request,
    stage: Stage,
}

impl<T> Delivery<T> {
    pub(crate) fn queue(mut handler: Box<dyn Handler<T>>, request: Request) -> Delivery<T> {
        handler.on_pre_request(&request);

        Delivery {
            handler,
            request,
            stage: Stage::Queued,
        }
    }

    #[cfg(test)]
    pub(crate) fn request(&self) -> &Request {
        &self.request
    }

    pub(crate) fn dispatch(&mut self) {
        if self.stage == Stage::Queued {
            self.stage = Stage::Dispatched;
            self.handler.on_post_request(&self.request);
        }
    }

    pub(crate) fn settle(mut self, outcome: Outcome<T>) {
        match outcome {
            Outcome::Success(value) => {
                self.dispatch();
                self.request.mark_settled();
                self.handler.on_success(value);
                self.handler.on_finish();
            }
            Outcome::Failed(error) => {
                self.dispatch();
                self.request.mark_settled();
                self.handler.on_fail(&error);
                self.handler.on_finish();
            }
            Outcome::Cancelled => {
                self.request.mark_cancelled();
                self.handler.on_cancel();
            }
        }

        trace!("request {} settled", self.request.key());
        self.stage = Stage::Settled;
    }
}

impl<T> Drop for Delivery<T> {
    fn drop(&mut self) {
        if self.stage != Stage::Settled {
            debug!(
                "request {} dropped before it settled; reporting it cancelled",
                self.request.key()
            );
            self.request.mark_cancelled();
            self.handler.on_cancel();
        }

        self.handler.on_destroy();
    }
}
