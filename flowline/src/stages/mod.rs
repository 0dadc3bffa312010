//! Stage constructors for pipeline assembly.
//!
//! Every constructor spawns one task that owns the send half of its output channel
//! and returns the read handle. The `*_with_shutdown` variants take a
//! [`crate::concurrency::shutdown::ShutdownRx`] as their first parameter and race
//! every blocking channel operation against it, so that no stage can block forever
//! once the pipeline is cancelled.

pub mod merge;
pub mod source;
pub mod transform;

pub use merge::{fan_out, fan_out_with_shutdown, merge, merge_with_shutdown};
pub use source::{source, source_with_shutdown};
pub use transform::{transform, transform_with_shutdown};
