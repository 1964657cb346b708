//! The `bandtrack import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::FileTracker;

pub fn execute(tracker: &mut FileTracker, file: PathBuf) -> Result<()> {
    let payload = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read backup: {}", file.display()))?;
    let state = tracker
        .import_state(&payload)
        .with_context(|| format!("failed to import {}", file.display()))?;
    let completed = state.records.iter().filter(|r| r.is_completed).count();
    println!(
        "Imported {} records ({completed} completed), schedule starts {}",
        state.records.len(),
        state.start_date.format("%a %d %b %Y")
    );
    Ok(())
}
