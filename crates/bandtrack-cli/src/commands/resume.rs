//! Running `bandtrack` with no subcommand: reopen the view used last.

use anyhow::Result;

use bandtrack_core::config::TrackerConfig;
use bandtrack_core::model::is_library_book;
use bandtrack_core::Tab;

use super::{books, stats, FileTracker};

pub fn execute(tracker: &FileTracker, config: &TrackerConfig) -> Result<()> {
    println!("{}\n", tracker.status());

    let ui = tracker.state().ui_state;
    match (ui.active_tab, ui.selected_book) {
        (Tab::Analytics, _) => stats::render(tracker, config),
        (Tab::Books, Some(book)) if is_library_book(book) => books::render_book(tracker, book)?,
        (Tab::Books, _) => books::render_library(tracker),
    }
    Ok(())
}
