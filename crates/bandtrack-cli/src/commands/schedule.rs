//! The `bandtrack schedule` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::FileTracker;

pub fn execute(tracker: &FileTracker, all: bool) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Id", "Test", "Done"]);

    let mut shown = 0;
    for test in tracker.projected() {
        if test.record.is_completed && !all {
            continue;
        }
        shown += 1;
        table.add_row(vec![
            Cell::new(test.projected_date.format("%a %d %b %Y").to_string()),
            Cell::new(test.record.id.to_string()),
            Cell::new(format!(
                "Book {} Test {}",
                test.record.book_number, test.record.test_number
            )),
            Cell::new(if test.record.is_completed { "yes" } else { "no" }),
        ]);
    }

    if shown == 0 {
        println!("All tests completed!");
    } else {
        println!("{table}");
    }
    Ok(())
}
