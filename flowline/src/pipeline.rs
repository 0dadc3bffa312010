use tracing::{debug, info};

use crate::bail;
use crate::concurrency::channel::StageRx;
use crate::concurrency::shutdown::{ShutdownRx, ShutdownTx, create_shutdown_channel};
use crate::config::PipelineConfig;
use crate::error::{ErrorKind, FlowResult};
use crate::stages;

pub type PipelineId = u64;

/// Assembles cancellation-aware stages around one shared shutdown signal.
///
/// [`Pipeline`] owns the signal's lifecycle: stages wired through it all observe the
/// same signal, [`Pipeline::shutdown`] raises it, and dropping the pipeline raises it
/// unconditionally. A driver that abandons a partially-drained pipeline therefore
/// still unwinds every stage it spawned.
///
/// Pipelines are independent of each other: each carries its own signal, so several
/// can run in one process without interfering.
#[derive(Debug)]
pub struct Pipeline {
    id: PipelineId,
    config: PipelineConfig,
    shutdown_tx: ShutdownTx,
}

impl Pipeline {
    /// Creates a new pipeline from a validated configuration.
    pub fn new(config: PipelineConfig) -> FlowResult<Self> {
        if let Err(err) = config.validate() {
            bail!(
                ErrorKind::ConfigError,
                "Invalid pipeline configuration",
                err.to_string(),
                source: err
            );
        }

        // The receiver half is dropped here; stages subscribe fresh receivers from the
        // transmitter as they are wired.
        let (shutdown_tx, _) = create_shutdown_channel();

        info!(pipeline_id = config.id, "created pipeline");

        Ok(Self {
            id: config.id,
            config,
            shutdown_tx,
        })
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    /// Returns a new receiver for this pipeline's shutdown signal.
    ///
    /// Useful for wiring stages manually alongside the built-in methods, or for
    /// consuming through [`crate::concurrency::stream::ShutdownStream`].
    pub fn shutdown_rx(&self) -> ShutdownRx {
        self.shutdown_tx.subscribe()
    }

    /// Spawns a cancellation-aware source stage bound to this pipeline's signal.
    pub fn source<I>(&self, values: I) -> StageRx<I::Item>
    where
        I: IntoIterator + Send + 'static,
        I::IntoIter: Send,
        I::Item: Send + 'static,
    {
        stages::source_with_shutdown(self.shutdown_rx(), values)
    }

    /// Spawns a cancellation-aware transform stage bound to this pipeline's signal.
    pub fn transform<T, U, F>(&self, input: StageRx<T>, map: F) -> StageRx<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        stages::transform_with_shutdown(self.shutdown_rx(), input, map)
    }

    /// Spawns a cancellation-aware merge stage bound to this pipeline's signal.
    pub fn merge<T>(&self, inputs: Vec<StageRx<T>>) -> StageRx<T>
    where
        T: Send + 'static,
    {
        stages::merge_with_shutdown(self.shutdown_rx(), inputs)
    }

    /// Spawns a fan-out/fan-in composition sized by `fan_out_workers` from the config.
    pub fn fan_out<T, U, F>(&self, input: StageRx<T>, map: F) -> StageRx<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnMut(T) -> U + Clone + Send + 'static,
    {
        stages::fan_out_with_shutdown(
            self.shutdown_rx(),
            input,
            self.config.fan_out_workers as usize,
            map,
        )
    }

    /// Raises the shutdown signal for every stage wired through this pipeline.
    pub fn shutdown(&self) {
        if self.shutdown_tx.shutdown() {
            info!(pipeline_id = self.id, "shutdown signal sent to all stages");
        } else {
            debug!(pipeline_id = self.id, "shutdown signal was already raised");
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        // The driver may exit without draining; stages must never outlive its interest
        // in results.
        self.shutdown();
    }
}
