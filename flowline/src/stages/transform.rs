use tracing::{Instrument, debug};

use crate::concurrency::channel::{StageRx, handoff_channel};
use crate::concurrency::shutdown::ShutdownRx;

/// Applies a mapping function to every value of `input`, preserving order.
///
/// The task reads until the input is closed and drained, sends each mapped value
/// downstream, then exits, closing its own output. No reordering, no dropping, no
/// buffering beyond the single-item handoff.
pub fn transform<T, U, F>(input: StageRx<T>, mut map: F) -> StageRx<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let stage = async move {
        while let Some(value) = input.recv().await {
            if tx.send(map(value)).await.is_err() {
                debug!("output handle dropped, stopping transform stage");
                return;
            }
        }

        debug!("input exhausted, stopping transform stage");
    };
    tokio::spawn(stage.instrument(tracing::debug_span!("transform_stage")));

    rx
}

/// Cancellation-aware variant of [`transform`].
///
/// Both the receive and the send race the shutdown signal, so a cancelled transform
/// stops consuming its input immediately instead of draining it; whichever stage
/// holds the other end of the input is then free to observe the signal itself.
pub fn transform_with_shutdown<T, U, F>(
    mut shutdown_rx: ShutdownRx,
    input: StageRx<T>,
    mut map: F,
) -> StageRx<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let stage = async move {
        loop {
            let value = tokio::select! {
                biased;

                _ = shutdown_rx.signaled() => {
                    debug!("shutdown signal received, stopping transform stage");
                    return;
                }

                value = input.recv() => match value {
                    Some(value) => value,
                    None => {
                        debug!("input exhausted, stopping transform stage");
                        return;
                    }
                },
            };

            tokio::select! {
                biased;

                _ = shutdown_rx.signaled() => {
                    debug!("shutdown signal received, stopping transform stage");
                    return;
                }

                result = tx.send(map(value)) => {
                    if result.is_err() {
                        debug!("output handle dropped, stopping transform stage");
                        return;
                    }
                }
            }
        }
    };
    tokio::spawn(stage.instrument(tracing::debug_span!("transform_stage")));

    rx
}
