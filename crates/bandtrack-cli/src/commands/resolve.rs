//! The `bandtrack resolve` command.

use anyhow::Result;

use super::{parse_id, FileTracker};

pub fn execute(tracker: &mut FileTracker, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let state = tracker.toggle_resolve(id)?;
    if let Some(record) = state.record(id) {
        if record.is_resolved {
            println!("{} marked as resolved", record.label());
        } else {
            println!("{} marked as not resolved", record.label());
        }
    }
    Ok(())
}
