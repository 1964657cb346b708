//! The `bandtrack score` command.

use anyhow::Result;

use bandtrack_core::ScoreInput;

use super::{parse_id, FileTracker};

pub fn execute(
    tracker: &mut FileTracker,
    id: &str,
    listening: &str,
    reading: &str,
    task1: &str,
    task2: &str,
) -> Result<()> {
    let id = parse_id(id)?;
    let scores = ScoreInput::from_form(listening, reading, task1, task2)?;
    let state = tracker.save_score(id, scores)?;

    if let Some(record) = state.record(id) {
        let band = record.calculated_band;
        println!(
            "Saved {}: overall {:.1} (listening {:.1}, reading {:.1}, writing {:.1})",
            record.label(),
            band.overall,
            band.listening,
            band.reading,
            band.writing
        );
        if let Some(due) = record.resolve_due().filter(|_| !record.is_resolved) {
            println!("Review mistakes by {}", due.format("%a %d %b"));
        }
    }
    Ok(())
}
