//! Cooperative cancellation for in-flight requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Owning half: held by the invoker, fired when the deadline elapses.
#[derive(Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: watch::Sender<bool>,
}

impl CancellationToken {
    /// Create a token and the signal handed to the transport.
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        let cancelled = Arc::new(AtomicBool::new(false));

        let token = Self {
            cancelled: cancelled.clone(),
            notify: tx,
        };
        let signal = CancelSignal {
            cancelled,
            notify: rx,
        };

        (token, signal)
    }

    /// Cancel the request.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.notify.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Observing half, passed to `Transport::send`.
///
/// Clones observe the same token. A signal whose token was dropped without
/// firing never resolves `cancelled()`.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
    notify: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        CancellationToken::new().1
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until the token fires.
    pub async fn cancelled(&mut self) {
        while !*self.notify.borrow_and_update() {
            if self.notify.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
