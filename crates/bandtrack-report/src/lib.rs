//! bandtrack-report: Progress report generation.
//!
//! Renders the tracker state as a self-contained HTML page with inline SVG
//! charts, for opening in a browser or archiving next to a backup.

pub mod html;

pub use html::{generate_html, write_html_report, ReportOptions};
