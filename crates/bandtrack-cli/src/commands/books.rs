//! The `bandtrack books` command: library overview and book detail.

use anyhow::Result;
use comfy_table::{Cell, Table};

use bandtrack_core::TrackerError;

use super::{band_cell, FileTracker};

pub fn execute(tracker: &mut FileTracker, book: Option<u32>) -> Result<()> {
    tracker.select_book(book)?;
    match book {
        Some(book) => render_book(tracker, book)?,
        None => render_library(tracker),
    }
    Ok(())
}

pub fn render_library(tracker: &FileTracker) {
    let mut table = Table::new();
    table.set_header(vec!["Book", "Done", "State", "Next planned"]);

    for progress in tracker.book_progress() {
        let state = if progress.is_finished() {
            "finished"
        } else if progress.completed > 0 {
            "in progress"
        } else {
            "not started"
        };
        let next = progress
            .tests
            .iter()
            .find(|t| !t.record.is_completed)
            .map_or_else(
                || "-".to_string(),
                |t| t.projected_date.format("%a %d %b %Y").to_string(),
            );
        table.add_row(vec![
            Cell::new(format!("Book {}", progress.book)),
            Cell::new(format!("{}/{}", progress.completed, progress.total)),
            Cell::new(state),
            Cell::new(next),
        ]);
    }

    println!("Library\n{table}");
    if let Some(finish) = tracker.finish_date() {
        println!("Estimated finish: {}", finish.format("%a %d %b %Y"));
    }
}

pub fn render_book(tracker: &FileTracker, book: u32) -> Result<()> {
    let progress = tracker.book_progress();
    let Some(entry) = progress.iter().find(|p| p.book == book) else {
        return Err(TrackerError::UnknownBook(book).into());
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Test", "Id", "Planned", "Done", "L", "R", "W", "Overall", "Review",
    ]);

    for test in &entry.tests {
        let record = test.record;
        let band = record.calculated_band;
        let review = match (record.is_completed, record.resolved_date) {
            (false, _) => "-".to_string(),
            (true, Some(date)) => format!("resolved {}", date.format("%d %b")),
            (true, None) => record
                .resolve_due()
                .map_or_else(|| "pending".to_string(), |due| {
                    format!("due {}", due.format("%d %b"))
                }),
        };
        table.add_row(vec![
            Cell::new(format!("Test {}", record.test_number)),
            Cell::new(record.id.to_string()),
            Cell::new(test.projected_date.format("%a %d %b %Y").to_string()),
            Cell::new(if record.is_completed { "yes" } else { "no" }),
            Cell::new(band_cell(record, band.listening)),
            Cell::new(band_cell(record, band.reading)),
            Cell::new(band_cell(record, band.writing)),
            Cell::new(band_cell(record, band.overall)),
            Cell::new(review),
        ]);
    }

    println!(
        "Book {book} ({}/{} completed)\n{table}",
        entry.completed, entry.total
    );
    Ok(())
}
