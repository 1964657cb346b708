pub mod books;
pub mod export;
pub mod import;
pub mod init;
pub mod report;
pub mod reset;
pub mod resolve;
pub mod resume;
pub mod schedule;
pub mod score;
pub mod stats;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};

use bandtrack_core::config::TrackerConfig;
use bandtrack_core::{Clock, FileStore, RecordId, TestRecord, Tracker};

/// The tracker as the CLI uses it: file-backed, on the system clock.
pub type FileTracker = Tracker<FileStore>;

pub fn open_tracker(config: &TrackerConfig) -> FileTracker {
    tracing::debug!("using data dir {}", config.data_dir.display());
    Tracker::open(FileStore::new(&config.data_dir), Clock::System)
}

pub fn parse_id(id: &str) -> Result<RecordId> {
    id.parse::<RecordId>()
        .with_context(|| format!("cannot use '{id}' as a test id"))
}

/// Band cell text; `-` for a test without scores.
pub fn band_cell(record: &TestRecord, band: f64) -> String {
    if record.is_completed {
        format!("{band:.1}")
    } else {
        "-".to_string()
    }
}
