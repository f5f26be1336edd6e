//! Completion handle returned by slide operations

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Resolves to `true` once a move settles, or `false` if it was rejected
///
/// Rejected moves (busy carousel, invalid target) resolve immediately. A
/// move abandoned by [`Carousel::setup`](crate::Carousel::setup) or
/// [`Carousel::destroy`](crate::Carousel::destroy) resolves to `false`.
///
/// The handle can be polled without an executor through
/// [`try_outcome`](Self::try_outcome), or awaited.
#[derive(Debug)]
pub struct MoveOutcome {
    receiver: oneshot::Receiver<bool>,
    resolved: Option<bool>,
}

impl MoveOutcome {
    /// An outcome the carousel resolves later through the returned sender
    pub(crate) fn pending() -> (Self, oneshot::Sender<bool>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                receiver,
                resolved: None,
            },
            sender,
        )
    }

    /// An outcome that is already `false`
    pub(crate) fn rejected() -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(false);
        Self {
            receiver,
            resolved: Some(false),
        }
    }

    /// The result, if the move has resolved
    pub fn try_outcome(&mut self) -> Option<bool> {
        if self.resolved.is_none() {
            self.resolved = match self.receiver.try_recv() {
                Ok(value) => Some(value),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(false),
            };
        }
        self.resolved
    }

    pub fn is_resolved(&mut self) -> bool {
        self.try_outcome().is_some()
    }
}

impl Future for MoveOutcome {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        if let Some(value) = self.resolved {
            return Poll::Ready(value);
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(result) => {
                let value = result.unwrap_or(false);
                self.resolved = Some(value);
                Poll::Ready(value)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_is_false() {
        let mut outcome = MoveOutcome::rejected();
        assert_eq!(outcome.try_outcome(), Some(false));
        assert!(!pollster::block_on(outcome));
    }

    #[test]
    fn test_pending_resolves_once() {
        let (mut outcome, sender) = MoveOutcome::pending();
        assert_eq!(outcome.try_outcome(), None);

        sender.send(true).unwrap();
        assert_eq!(outcome.try_outcome(), Some(true));
        // Cached, a drained channel does not turn into `false`
        assert_eq!(outcome.try_outcome(), Some(true));
    }

    #[test]
    fn test_dropped_sender_is_false() {
        let (outcome, sender) = MoveOutcome::pending();
        drop(sender);
        assert!(!pollster::block_on(outcome));
    }
}
