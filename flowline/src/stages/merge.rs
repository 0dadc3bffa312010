use tokio::task::JoinSet;
use tracing::{Instrument, debug, error};

use crate::concurrency::channel::{HandoffTx, StageRx, handoff_channel};
use crate::concurrency::shutdown::ShutdownRx;
use crate::error::ErrorKind;
use crate::flow_error;
use crate::stages::transform::{transform, transform_with_shutdown};

/// Multiplexes the values of N input channels onto one output channel.
///
/// One forwarder task per input copies values until that input closes. A supervisory
/// task owns the forwarders' [`JoinSet`] and the last send handle: the merged output
/// closes exactly once, only after every forwarder has completed. Order within one
/// input is preserved; interleaving across inputs is scheduler-dependent.
///
/// Merging zero inputs yields an immediately-closed output.
pub fn merge<T>(inputs: Vec<StageRx<T>>) -> StageRx<T>
where
    T: Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let mut forwarders = JoinSet::new();
    for input in inputs {
        let tx = tx.clone();
        forwarders.spawn(
            async move {
                while let Some(value) = input.recv().await {
                    if tx.send(value).await.is_err() {
                        debug!("output handle dropped, stopping forwarder");
                        return;
                    }
                }
            }
            .instrument(tracing::debug_span!("merge_forwarder")),
        );
    }

    supervise(forwarders, tx);

    rx
}

/// Cancellation-aware variant of [`merge`].
///
/// Forwarders race receives and sends against the shutdown signal and return
/// immediately once it is observed, without draining their inputs. Completion is
/// still reported through the [`JoinSet`], so the supervisor is never stuck and the
/// merged output closes on every path.
pub fn merge_with_shutdown<T>(shutdown_rx: ShutdownRx, inputs: Vec<StageRx<T>>) -> StageRx<T>
where
    T: Send + 'static,
{
    let (tx, rx) = handoff_channel();

    let mut forwarders = JoinSet::new();
    for input in inputs {
        let tx = tx.clone();
        let mut shutdown_rx = shutdown_rx.clone();
        forwarders.spawn(
            async move {
                loop {
                    let value = tokio::select! {
                        biased;

                        _ = shutdown_rx.signaled() => {
                            debug!("shutdown signal received, stopping forwarder");
                            return;
                        }

                        value = input.recv() => match value {
                            Some(value) => value,
                            None => return,
                        },
                    };

                    tokio::select! {
                        biased;

                        _ = shutdown_rx.signaled() => {
                            debug!("shutdown signal received, stopping forwarder");
                            return;
                        }

                        result = tx.send(value) => {
                            if result.is_err() {
                                debug!("output handle dropped, stopping forwarder");
                                return;
                            }
                        }
                    }
                }
            }
            .instrument(tracing::debug_span!("merge_forwarder")),
        );
    }

    supervise(forwarders, tx);

    rx
}

/// Distributes one input across `workers` transform stages and merges their outputs.
///
/// Fan-out needs no coordination of its own: the shared input handle delivers each
/// value to exactly one worker. The merged multiset equals the mapped input;
/// cross-worker ordering is scheduler-dependent. Zero workers yields an
/// immediately-closed output, leaving the input untouched.
pub fn fan_out<T, U, F>(input: StageRx<T>, workers: usize, map: F) -> StageRx<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Clone + Send + 'static,
{
    let outputs = (0..workers)
        .map(|_| transform(input.clone(), map.clone()))
        .collect();

    merge(outputs)
}

/// Cancellation-aware variant of [`fan_out`].
pub fn fan_out_with_shutdown<T, U, F>(
    shutdown_rx: ShutdownRx,
    input: StageRx<T>,
    workers: usize,
    map: F,
) -> StageRx<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Clone + Send + 'static,
{
    let outputs = (0..workers)
        .map(|_| transform_with_shutdown(shutdown_rx.clone(), input.clone(), map.clone()))
        .collect();

    merge_with_shutdown(shutdown_rx, outputs)
}

/// Drains the forwarder set, then drops the last send handle, closing the merged
/// output. Closing earlier would fail forwarders still writing; closing later would
/// leak the reader, so the close belongs to this task alone.
fn supervise<T>(mut forwarders: JoinSet<()>, tx: HandoffTx<T>)
where
    T: Send + 'static,
{
    tokio::spawn(
        async move {
            while let Some(result) = forwarders.join_next().await {
                match result {
                    Ok(()) => {}
                    Err(err) if err.is_cancelled() => {
                        debug!("forwarder task was cancelled");
                    }
                    Err(err) => {
                        error!(
                            error = %flow_error!(ErrorKind::StagePanic, "Merge forwarder panicked", err),
                            "forwarder task panicked"
                        );
                    }
                }
            }

            drop(tx);
            debug!("all forwarders completed, merged output closed");
        }
        .instrument(tracing::debug_span!("merge_supervisor")),
    );
}
