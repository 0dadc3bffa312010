//! Composable concurrent pipeline primitives.
//!
//! Stages are independent tasks connected by single-item handoff channels: a source
//! produces values, transforms map them, and merge multiplexes several inputs into one
//! output. Fan-out falls out of sharing a read handle between transforms, and
//! cooperative cancellation unwinds every stage through a broadcast shutdown signal.
//!
//! The building blocks live in [`stages`] and [`concurrency`]; [`pipeline::Pipeline`]
//! is the driver-facing assembly point that owns the shutdown signal's lifecycle.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod macros;
pub mod pipeline;
pub mod stages;
