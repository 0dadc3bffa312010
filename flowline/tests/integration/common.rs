use std::time::Duration;

use flowline::concurrency::channel::StageRx;
use tokio::time::timeout;

/// Timeout for waits that must complete within a bounded number of scheduling steps.
///
/// Chosen empirically: close propagation through a few stage edges takes
/// milliseconds, so a multi-second bound only trips on a genuine hang.
pub const BOUNDED_WAIT: Duration = Duration::from_secs(5);

/// Receives the next value, panicking if the channel neither yields nor closes in
/// time.
pub async fn recv_bounded<T>(rx: &StageRx<T>) -> Option<T> {
    timeout(BOUNDED_WAIT, rx.recv())
        .await
        .expect("channel neither yielded a value nor closed within the bound")
}

/// Drains the channel into a vector, panicking if closure is not observed in time.
pub async fn drain_bounded<T>(rx: &StageRx<T>) -> Vec<T> {
    let mut values = Vec::new();
    while let Some(value) = recv_bounded(rx).await {
        values.push(value);
    }
    values
}
