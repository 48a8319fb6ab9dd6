//! # Debounce Module
//!
//! ## Purpose
//! Delays propagation of a rapidly-changing value until the input has been
//! quiet for a fixed interval. Used to throttle cache-invalidating work
//! triggered by keystroke-rate input changes, but generic over any value
//! type; nothing here knows about cache keys.
//!
//! ## Input/Output Specification
//! - **Input**: A stream of `update(value)` calls at arbitrary times
//! - **Output**: A watch channel that receives only the last value of each
//!   quiet window, `delay` after the final update of that window
//! - **Cancellation**: Each `update` aborts the previously scheduled publish;
//!   dropping the debouncer aborts any still-pending publish
//!
//! Must be used from within a tokio runtime; the pending publish is a spawned
//! task sleeping on the tokio timer wheel.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Debounced value holder. Consumers observe the settled value through
/// [`Debouncer::subscribe`] or [`Debouncer::current`].
pub struct Debouncer<T> {
    delay: Duration,
    tx: Arc<watch::Sender<T>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    /// Create a debouncer seeded with `initial`, publishing updates only
    /// after `delay` of input silence
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            delay,
            tx: Arc::new(tx),
            pending: Mutex::new(None),
        }
    }

    /// Feed a new input value. Any publish scheduled by a previous `update`
    /// is canceled first, so only the latest value of a burst survives.
    pub fn update(&self, value: T) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!("debounce window elapsed, publishing value");
            let _ = tx.send(value);
        }));
    }

    /// Cancel the pending publish, if any, without feeding a new value.
    /// Used on consumer teardown so a late publish cannot fire into a
    /// dismantled subscriber.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    /// Subscribe to settled values
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// The most recently published (settled) value
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_publishes_only_last_value() {
        let debouncer = Debouncer::new(String::new(), Duration::from_millis(300));
        let mut rx = debouncer.subscribe();

        // updates at t=0, t=100, t=250, then held
        debouncer.update("f".to_string());
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.update("fo".to_string());
        tokio::time::advance(Duration::from_millis(150)).await;
        debouncer.update("foc".to_string());

        // t=399: the t=0 and t=100 publishes were superseded, the t=250 one
        // has not elapsed yet
        tokio::time::advance(Duration::from_millis(149)).await;
        tokio::task::yield_now().await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(debouncer.current(), "");

        // t=551: the t=250 update settles at t=550
        tokio::time::advance(Duration::from_millis(152)).await;
        tokio::task::yield_now().await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "foc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_input_publishes_after_delay() {
        let debouncer = Debouncer::new(0u32, Duration::from_millis(300));
        debouncer.update(42);

        tokio::time::advance(Duration::from_millis(301)).await;
        tokio::task::yield_now().await;
        assert_eq!(debouncer.current(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending_publish() {
        let debouncer = Debouncer::new(0u32, Duration::from_millis(300));
        debouncer.update(42);
        debouncer.cancel();

        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(debouncer.current(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_publish() {
        let debouncer = Debouncer::new(0u32, Duration::from_millis(300));
        let rx = debouncer.subscribe();
        debouncer.update(42);
        drop(debouncer);

        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(*rx.borrow(), 0);
    }
}
