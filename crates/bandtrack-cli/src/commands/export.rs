//! The `bandtrack export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use bandtrack_core::tracker::export_file_name;

use super::FileTracker;

pub fn execute(tracker: &FileTracker, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| {
        PathBuf::from(export_file_name(tracker.clock().now().date_naive()))
    });
    let json = tracker.export_state()?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write backup to {}", path.display()))?;
    println!(
        "Exported {} records to {}",
        tracker.state().records.len(),
        path.display()
    );
    Ok(())
}
