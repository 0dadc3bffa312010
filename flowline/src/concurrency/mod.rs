//! Concurrency primitives for coordinating pipeline stages.
//!
//! Three building blocks back every pipeline:
//!
//! - The [`channel`] module provides the single-item handoff channel between stages.
//!   Only the task that created a channel holds its send half, so channels are closed
//!   exactly once, by their owner, on every exit path.
//! - The [`shutdown`] module implements the broadcast cancellation signal: one
//!   transmitter, any number of receivers, a one-way latched transition that every
//!   blocking point in a stage offers as an alternative wake-up condition.
//! - The [`stream`] module adapts stage output into shutdown-aware streams for
//!   consumers that read a bounded prefix of a pipeline before cancelling it.

pub mod channel;
pub mod shutdown;
pub mod stream;
