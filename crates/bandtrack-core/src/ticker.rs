//! Periodic countdown refresh.
//!
//! A `Ticker` runs a callback immediately and then once per period on the
//! tokio runtime. The returned handle owns the task: cancelling it, or just
//! dropping it when the consuming view goes away, stops the callback for
//! good.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default refresh period for the countdown banner.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

/// Spawns periodic callbacks.
pub struct Ticker;

impl Ticker {
    /// Start calling `on_tick` every `period`, first call right away.
    ///
    /// The callback receives the 1-based tick number. Must be called from
    /// within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> TickerHandle
    where
        F: FnMut(u64) + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick = 0u64;
            loop {
                tokio::select! {
                    _ = &mut cancel_rx => break,
                    _ = interval.tick() => {
                        tick += 1;
                        on_tick(tick);
                    }
                }
            }
            tracing::debug!("ticker stopped after {tick} ticks");
        });

        TickerHandle {
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }
}

/// Handle to a running ticker. Dropping it stops the ticker.
pub struct TickerHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stop the ticker and wait until its task has finished.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn counting() -> (Arc<AtomicU64>, impl FnMut(u64) + Send + 'static) {
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        (count, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_immediately_then_every_period() {
        let (count, on_tick) = counting();
        let handle = Ticker::spawn(Duration::from_secs(60), on_tick);

        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_callbacks() {
        let (count, on_tick) = counting();
        let handle = Ticker::spawn(Duration::from_secs(60), on_tick);

        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.cancel().await;
        let after_cancel = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
        assert_eq!(after_cancel, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_callbacks() {
        let (count, on_tick) = counting();
        let handle = Ticker::spawn(Duration::from_secs(60), on_tick);
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_receives_tick_numbers() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = Ticker::spawn(Duration::from_secs(10), move |tick| {
            sink.lock().unwrap().push(tick);
        });
        tokio::time::sleep(Duration::from_secs(25)).await;
        handle.cancel().await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
