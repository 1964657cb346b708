//! The `bandtrack report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use bandtrack_core::config::TrackerConfig;
use bandtrack_report::{write_html_report, ReportOptions};

use super::FileTracker;

pub fn execute(tracker: &FileTracker, config: &TrackerConfig, output: PathBuf) -> Result<()> {
    let options = ReportOptions {
        generated_at: tracker.clock().now(),
        targets: config.targets,
        heatmap_days: config.heatmap_days,
    };
    write_html_report(tracker.state(), &options, &output)
        .with_context(|| format!("failed to write report to {}", output.display()))?;
    println!("Report written to {}", output.display());
    Ok(())
}
