use tracing::{Instrument, debug};

use crate::concurrency::channel::{StageRx, handoff_channel};
use crate::concurrency::shutdown::ShutdownRx;

/// Produces a finite ordered sequence of values onto a fresh output channel.
///
/// A dedicated task sends each value in order and exits once the iterator is
/// exhausted, closing the channel. Production is lazy: the single-item handoff keeps
/// the task at most one value ahead of its consumer.
pub fn source<I>(values: I) -> StageRx<I::Item>
where
    I: IntoIterator + Send + 'static,
    I::IntoIter: Send,
    I::Item: Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let stage = async move {
        for value in values {
            if tx.send(value).await.is_err() {
                debug!("output handle dropped, stopping source stage");
                return;
            }
        }

        debug!("source stage exhausted its values");
    };
    tokio::spawn(stage.instrument(tracing::debug_span!("source_stage")));

    rx
}

/// Cancellation-aware variant of [`source`].
///
/// Every send races the shutdown signal; once the signal is observed the task stops
/// early and the output still closes, releasing any consumer blocked on it. A value
/// whose send loses the race to the signal is dropped — the accepted cost of
/// advisory cancellation.
pub fn source_with_shutdown<I>(mut shutdown_rx: ShutdownRx, values: I) -> StageRx<I::Item>
where
    I: IntoIterator + Send + 'static,
    I::IntoIter: Send,
    I::Item: Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let stage = async move {
        for value in values {
            tokio::select! {
                biased;

                _ = shutdown_rx.signaled() => {
                    debug!("shutdown signal received, stopping source stage");
                    return;
                }

                result = tx.send(value) => {
                    if result.is_err() {
                        debug!("output handle dropped, stopping source stage");
                        return;
                    }
                }
            }
        }

        debug!("source stage exhausted its values");
    };
    tokio::spawn(stage.instrument(tracing::debug_span!("source_stage")));

    rx
}
