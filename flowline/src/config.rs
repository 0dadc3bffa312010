//! Pipeline configuration.

use serde::Deserialize;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Fan-out worker count cannot be zero.
    #[error("`fan_out_workers` cannot be zero")]
    FanOutWorkersZero,
}

const fn default_fan_out_workers() -> u16 {
    2
}

/// Configuration for a pipeline instance.
///
/// Contains the settings used when assembling stages through
/// [`crate::pipeline::Pipeline`].
#[derive(Clone, Debug, Deserialize)]
pub struct PipelineConfig {
    /// The unique identifier for this pipeline.
    ///
    /// The id only disambiguates concurrent pipelines in logs; independent pipelines
    /// share nothing else.
    pub id: u64,
    /// Number of transform workers spawned by fan-out when no explicit count is given.
    #[serde(default = "default_fan_out_workers")]
    pub fan_out_workers: u16,
}

impl PipelineConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fan_out_workers == 0 {
            return Err(ValidationError::FanOutWorkersZero);
        }

        Ok(())
    }
}
