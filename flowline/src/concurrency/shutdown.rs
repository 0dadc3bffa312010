//! Pipeline-wide shutdown signaling.
//!
//! A shutdown channel is a broadcast latch built on a watch channel: the transmitter
//! performs a one-way `unsignaled -> signaled` transition and every receiver observes
//! it, including receivers subscribed after the fact. The signal carries no payload;
//! it is a pure "stop" broadcast that stages race against their channel operations.

use tokio::sync::watch;

/// Creates a new shutdown channel pair.
///
/// The transmitter is held by whoever owns the pipeline's lifecycle (typically
/// [`crate::pipeline::Pipeline`]); receivers are handed to every stage that must
/// observe cancellation. Additional receivers come from [`ShutdownTx::subscribe`].
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);

    (ShutdownTx { tx }, ShutdownRx { rx })
}

/// Transmitter half of a shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownTx {
    tx: watch::Sender<bool>,
}

impl ShutdownTx {
    /// Performs the one-way `unsignaled -> signaled` transition.
    ///
    /// Returns `true` if this call performed the transition, `false` if the signal was
    /// already raised. Raising the signal cannot fail and is permanent: receivers that
    /// subscribe afterwards still observe it.
    pub fn shutdown(&self) -> bool {
        !self.tx.send_replace(true)
    }

    /// Returns a new receiver observing this signal.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx {
            rx: self.tx.subscribe(),
        }
    }

    /// Returns whether the signal has been raised.
    pub fn is_signaled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiver half of a shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx {
    rx: watch::Receiver<bool>,
}

impl ShutdownRx {
    /// Waits until the shutdown signal is observed.
    ///
    /// Observation is sticky: once the signal is raised this resolves immediately on
    /// every subsequent call. A dropped [`ShutdownTx`] counts as a signal, so a stage
    /// can never block forever waiting on a driver that went away.
    pub async fn signaled(&mut self) {
        // wait_for only errors when the transmitter is dropped, which counts as a signal.
        let _ = self.rx.wait_for(|signaled| *signaled).await;
    }

    /// Returns whether the signal has been raised, without waiting.
    pub fn is_signaled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}
