//! Shutdown-aware stream consumption.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::future::Future;

use futures::Stream;
use futures::future::BoxFuture;
use pin_project_lite::pin_project;
use tracing::debug;

use crate::concurrency::shutdown::ShutdownRx;

pin_project! {
    /// A stream adapter that ends the stream once the shutdown signal is observed.
    ///
    /// The signal is checked with priority over the inner stream, so a consumer that
    /// reads a bounded prefix of an otherwise endless pipeline can stop promptly after
    /// triggering shutdown instead of waiting for upstream stages to notice. The
    /// shutdown side is a polled future of its own, which means a consumer blocked on
    /// an open-but-empty stream is woken by the signal itself.
    #[must_use = "streams do nothing unless polled"]
    pub struct ShutdownStream<S> {
        #[pin]
        stream: S,
        signaled: BoxFuture<'static, ()>,
        stopped: bool,
    }
}

impl<S> ShutdownStream<S> {
    /// Creates a new [`ShutdownStream`] wrapping `stream`.
    pub fn wrap(stream: S, mut shutdown_rx: ShutdownRx) -> Self {
        Self {
            stream,
            signaled: Box::pin(async move { shutdown_rx.signaled().await }),
            stopped: false,
        }
    }
}

impl<S: Stream> Stream for ShutdownStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.stopped {
            return Poll::Ready(None);
        }

        // The shutdown side is polled first so that a raised signal ends the stream
        // even while the inner stream has items ready.
        if this.signaled.as_mut().poll(cx).is_ready() {
            debug!("stream stopped due to shutdown signal");
            *this.stopped = true;

            return Poll::Ready(None);
        }

        this.stream.poll_next(cx)
    }
}
