//! The `bandtrack reset` command.

use std::io::{BufRead, Write};

use anyhow::Result;

use super::FileTracker;

pub fn execute(tracker: &mut FileTracker, yes: bool) -> Result<()> {
    if !yes && !confirm()? {
        println!("Reset cancelled.");
        return Ok(());
    }
    let state = tracker.reset();
    println!(
        "All progress erased. New schedule starts {}",
        state.start_date.format("%a %d %b %Y")
    );
    Ok(())
}

fn confirm() -> Result<bool> {
    print!("Erase ALL progress and restart the schedule from today? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
