//! The `bandtrack watch` command: a live countdown.

use anyhow::Result;
use tokio::sync::mpsc;

use bandtrack_core::config::TrackerConfig;
use bandtrack_core::schedule::{self, Status};
use bandtrack_core::ticker::Ticker;

use super::FileTracker;

pub async fn execute(
    tracker: &FileTracker,
    config: &TrackerConfig,
    ticks: Option<u64>,
) -> Result<()> {
    let state = tracker.state().clone();
    let clock = tracker.clock();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = Ticker::spawn(config.refresh_period(), move |tick| {
        let projected = schedule::project_dates(&state.records, state.start_date.date_naive());
        let now = clock.now();
        let status = schedule::status_for(now, schedule::next_pending(&projected));
        let _ = tx.send((tick, now, status));
    });

    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some((tick, now, status)) = received else {
                    break;
                };
                println!("[{}] {status}", now.format("%H:%M"));
                if status == Status::AllComplete || ticks.is_some_and(|max| tick >= max) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }

    handle.cancel().await;
    Ok(())
}
