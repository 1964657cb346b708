//! The `bandtrack status` command.

use anyhow::Result;

use bandtrack_core::schedule;

use super::FileTracker;

pub fn execute(tracker: &FileTracker) -> Result<()> {
    println!("{}", tracker.status());

    let projected = tracker.projected();
    if let Some(next) = schedule::next_pending(&projected) {
        println!(
            "Next up: Book {} Test {} ({}), planned for {}",
            next.record.book_number,
            next.record.test_number,
            next.record.id,
            next.projected_date.format("%a %d %b %Y")
        );
    }

    let done = projected.iter().filter(|p| p.record.is_completed).count();
    println!("Progress: {done}/{} tests", projected.len());
    if let Some(finish) = tracker.finish_date() {
        println!("Estimated finish: {}", finish.format("%a %d %b %Y"));
    }
    Ok(())
}
