use super::{Outcome, Request};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Future resolving to the [`Outcome`] of a queued request.
///
/// Dropping an unresolved `Pending` cancels its request.
#[must_use = "dropping a `Pending` cancels its request"]
pub struct Pending<T> {
    request: Request,
    rx: oneshot::Receiver<Outcome<T>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Returns the pending future and the handler that completes it.
    pub(crate) fn channel(
        request: &Request,
    ) -> (Pending<T>, impl FnMut(Outcome<T>) + Send + 'static) {
        let (tx, rx) = oneshot::channel();
        let mut tx = Some(tx);

        let pending = Pending {
            request: request.clone(),
            rx,
        };

        let complete = move |outcome: Outcome<T>| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(outcome);
            }
        };

        (pending, complete)
    }
}

impl<T> Pending<T> {
    /// Handle for cancelling the request without dropping the future.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl<T> Future for Pending<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome<T>> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Outcome::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        self.request.cancel();
    }
}
