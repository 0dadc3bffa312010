//! Single-item handoff channels between stages.
//!
//! A stage owns the send half of its output channel: the half never leaves this
//! crate, so only the owning stage task can write to a channel, and the channel
//! closes exactly once, when that task exits and drops the sender. What callers get
//! back is [`StageRx`], a cloneable read handle; several downstream stages may share
//! one upstream (fan-out), with each value delivered to exactly one of them.
//!
//! Tokio has no zero-capacity rendezvous channel; capacity one is the closest
//! rendition of the unbuffered handoff. A producer stalls until its previous value
//! has been taken, so a slow consumer stalls its whole upstream chain.

use std::fmt;
use std::sync::Arc;

use futures::Stream;
use tokio::sync::Mutex;
use tokio::sync::mpsc;

/// Number of in-flight values per stage edge.
const HANDOFF_CAPACITY: usize = 1;

/// Send half of a stage output channel. Never exposed outside the crate.
pub(crate) type HandoffTx<T> = mpsc::Sender<T>;

/// Creates the handoff channel for one stage output.
pub(crate) fn handoff_channel<T>() -> (HandoffTx<T>, StageRx<T>) {
    let (tx, rx) = mpsc::channel(HANDOFF_CAPACITY);

    (tx, StageRx::new(rx))
}

/// Cloneable read handle to a stage's output channel.
///
/// Cloning does not duplicate values: all clones draw from the same underlying
/// channel, and each value is delivered to exactly one caller of [`StageRx::recv`].
/// This is what makes fan-out free of coordination: hand the same handle to several
/// transform stages and the channel distributes the work between them.
pub struct StageRx<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> StageRx<T> {
    pub(crate) fn new(rx: mpsc::Receiver<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rx)),
        }
    }

    /// Receives the next value, or `None` once the owning stage has exited and the
    /// channel is drained.
    ///
    /// The internal lock is held only for the duration of one receive, which is what
    /// guarantees exactly-one delivery under fan-out.
    pub async fn recv(&self) -> Option<T> {
        self.inner.lock().await.recv().await
    }

    /// Converts this handle into a [`Stream`] of the remaining values.
    ///
    /// The stream ends when the channel is closed and drained. Other clones of the
    /// handle keep competing for values while the stream is consumed.
    pub fn into_stream(self) -> impl Stream<Item = T> {
        futures::stream::unfold(self, |rx| async move {
            rx.recv().await.map(|value| (value, rx))
        })
    }
}

impl<T> Clone for StageRx<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for StageRx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRx").finish_non_exhaustive()
    }
}
