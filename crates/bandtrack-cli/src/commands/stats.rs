//! The `bandtrack stats` command: averages, target gaps, progression.

use anyhow::Result;
use comfy_table::{Cell, Table};

use bandtrack_core::analytics::{self, Summary};
use bandtrack_core::config::TrackerConfig;
use bandtrack_core::Tab;

use super::FileTracker;

pub fn execute(tracker: &mut FileTracker, config: &TrackerConfig) -> Result<()> {
    tracker.set_active_tab(Tab::Analytics);
    render(tracker, config);
    Ok(())
}

fn fmt_band(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn print_summary(summary: &Summary) {
    let mut table = Table::new();
    table.set_header(vec![
        "Completed",
        "Avg Overall",
        "Avg Listening",
        "Avg Reading",
        "Avg Writing",
        "Pending Review",
    ]);
    table.add_row(vec![
        Cell::new(summary.completed),
        Cell::new(fmt_band(summary.avg_overall)),
        Cell::new(fmt_band(summary.avg_listening)),
        Cell::new(fmt_band(summary.avg_reading)),
        Cell::new(fmt_band(summary.avg_writing)),
        Cell::new(summary.pending_review),
    ]);
    println!("{table}");
}

pub fn render(tracker: &FileTracker, config: &TrackerConfig) {
    let records = &tracker.state().records;
    let summary = analytics::summarize(records);
    if summary.completed == 0 {
        println!("No completed tests yet.");
        return;
    }
    print_summary(&summary);

    let points = analytics::trend(records);

    let mut targets = Table::new();
    targets.set_header(vec!["Skill", "Latest", "Target", "Gap"]);
    for gap in analytics::target_gaps(&points, &config.targets) {
        let status = if gap.is_met() {
            "met".to_string()
        } else {
            format!("{:+.1}", gap.gap())
        };
        targets.add_row(vec![
            Cell::new(gap.skill),
            Cell::new(format!("{:.1}", gap.latest)),
            Cell::new(format!("{:.1}", gap.target)),
            Cell::new(status),
        ]);
    }
    println!("\nTargets\n{targets}");

    let mut trend = Table::new();
    trend.set_header(vec![
        "Test", "Completed", "L", "R", "W", "Task 1", "Task 2", "Overall",
    ]);
    for point in &points {
        trend.add_row(vec![
            Cell::new(&point.label),
            Cell::new(
                point
                    .completed_at
                    .map_or_else(|| "-".to_string(), |d| d.format("%d %b %Y").to_string()),
            ),
            Cell::new(format!("{:.1}", point.listening)),
            Cell::new(format!("{:.1}", point.reading)),
            Cell::new(format!("{:.1}", point.writing)),
            Cell::new(fmt_band(point.task1)),
            Cell::new(fmt_band(point.task2)),
            Cell::new(format!("{:.1}", point.overall)),
        ]);
    }
    println!("\nProgression\n{trend}");

    let today = tracker.clock().now().date_naive();
    let days = analytics::activity(records, today, config.heatmap_days);
    let tests: usize = days.iter().map(|d| d.count).sum();
    let active = days.iter().filter(|d| d.count > 0).count();
    println!(
        "\nLast {} days: {tests} tests on {active} days",
        config.heatmap_days
    );
}
