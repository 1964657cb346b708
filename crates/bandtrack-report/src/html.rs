//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and charts drawn
//! as inline SVG.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};

use bandtrack_core::analytics::{self, Targets, TrendPoint, DEFAULT_HEATMAP_DAYS};
use bandtrack_core::model::AppState;
use bandtrack_core::schedule;
use bandtrack_core::scoring::MAX_BAND;

/// What to include in a report besides the state itself.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Timestamp printed in the header; also the last day of the heatmap.
    pub generated_at: DateTime<Utc>,
    pub targets: Targets,
    pub heatmap_days: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            generated_at: Utc::now(),
            targets: Targets::default(),
            heatmap_days: DEFAULT_HEATMAP_DAYS,
        }
    }
}

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn fmt_avg(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

/// Generate an HTML progress report.
pub fn generate_html(state: &AppState, options: &ReportOptions) -> String {
    let projected = schedule::project_dates(&state.records, state.start_date.date_naive());
    let progress = schedule::book_progress(&projected);
    let points = analytics::trend(&state.records);
    let summary = analytics::summarize(&state.records);
    let gaps = analytics::target_gaps(&points, &options.targets);
    let today = options.generated_at.date_naive();

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>bandtrack report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>bandtrack report</h1>\n");
    let finish = schedule::finish_date(&projected)
        .map_or_else(|| "-".to_string(), |d| d.format("%a %d %b %Y").to_string());
    html.push_str(&format!(
        "<p class=\"meta\">Started {} | Estimated finish <strong>{}</strong> | {} of {} tests completed | {}</p>\n",
        state.start_date.format("%a %d %b %Y"),
        finish,
        summary.completed,
        state.records.len(),
        options.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Avg Overall</th><th>Avg Listening</th><th>Avg Reading</th><th>Avg Writing</th><th>Resolved</th><th>Pending Review</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></tbody>\n",
        fmt_avg(summary.avg_overall),
        fmt_avg(summary.avg_listening),
        fmt_avg(summary.avg_reading),
        fmt_avg(summary.avg_writing),
        summary.resolved,
        summary.pending_review,
    ));
    html.push_str("</table>\n");

    if !gaps.is_empty() {
        html.push_str("<table class=\"targets\">\n");
        html.push_str("<thead><tr><th>Skill</th><th>Latest</th><th>Target</th><th>Gap</th></tr></thead>\n<tbody>\n");
        for gap in &gaps {
            let class = if gap.is_met() { "pass" } else { "fail" };
            html.push_str(&format!(
                "<tr class=\"{class}\"><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{:+.1}</td></tr>\n",
                gap.skill,
                gap.latest,
                gap.target,
                gap.gap()
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Activity heatmap
    html.push_str("<section class=\"activity\">\n");
    html.push_str(&format!(
        "<h2>Activity (last {} days)</h2>\n<div class=\"heatmap\">\n",
        options.heatmap_days
    ));
    for day in analytics::activity(&state.records, today, options.heatmap_days) {
        html.push_str(&format!(
            "<div class=\"cell level-{}\" title=\"{}: {} tests\"></div>\n",
            day.level(),
            day.date.format("%Y-%m-%d"),
            day.count
        ));
    }
    html.push_str("</div>\n</section>\n");

    // Charts
    html.push_str("<section class=\"charts\">\n");
    html.push_str("<h2>Skill Progression</h2>\n");
    if points.is_empty() {
        html.push_str("<p class=\"empty\">No completed tests yet.</p>\n");
    } else {
        html.push_str(&skill_chart(&points, &options.targets));
        html.push_str("<h2>Writing Breakdown</h2>\n");
        html.push_str(&writing_chart(&points));
    }
    html.push_str("</section>\n");

    // Library
    html.push_str("<section class=\"library\">\n");
    html.push_str("<h2>Library</h2>\n");
    html.push_str("<table class=\"library-table\">\n");
    html.push_str("<thead><tr><th>Book</th><th>Done</th><th>Test 1</th><th>Test 2</th><th>Test 3</th><th>Test 4</th></tr></thead>\n<tbody>\n");
    for book in &progress {
        html.push_str(&format!(
            "<tr><td>Book {}</td><td>{}/{}</td>",
            book.book, book.completed, book.total
        ));
        for test in &book.tests {
            let record = test.record;
            let (class, text) = if record.is_completed {
                let review = if record.is_resolved { "" } else { " *" };
                ("pass", format!("{:.1}{review}", record.calculated_band.overall))
            } else {
                ("pending", test.projected_date.format("%a %d %b").to_string())
            };
            html.push_str(&format!("<td class=\"{class}\">{text}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    html.push_str("<p class=\"meta\">* completed, mistakes not reviewed yet</p>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(state).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(state: &AppState, options: &ReportOptions, path: &Path) -> Result<()> {
    let html = generate_html(state, options);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 280.0;
const PAD_LEFT: f64 = 40.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 20.0;
const PAD_BOTTOM: f64 = 40.0;

struct Series<'a> {
    name: &'a str,
    color: &'a str,
    values: Vec<Option<f64>>,
}

fn x_at(index: usize, count: usize) -> f64 {
    let plot_w = CHART_WIDTH - PAD_LEFT - PAD_RIGHT;
    if count <= 1 {
        PAD_LEFT + plot_w / 2.0
    } else {
        PAD_LEFT + index as f64 * plot_w / (count - 1) as f64
    }
}

fn y_at(band: f64) -> f64 {
    let plot_h = CHART_HEIGHT - PAD_TOP - PAD_BOTTOM;
    PAD_TOP + plot_h * (1.0 - band.clamp(0.0, MAX_BAND) / MAX_BAND)
}

fn line_chart(labels: &[&str], series: &[Series<'_>], references: &[(&str, &str, f64)]) -> String {
    let mut svg = format!(
        "<svg width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );

    // Grid
    for band in 0..=9u8 {
        let y = y_at(f64::from(band));
        svg.push_str(&format!(
            "  <line x1=\"{PAD_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"currentColor\" stroke-opacity=\"0.1\"/>\n",
            CHART_WIDTH - PAD_RIGHT
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{band}</text>\n",
            PAD_LEFT - 8.0
        ));
    }

    for (i, label) in labels.iter().enumerate() {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>\n",
            x_at(i, labels.len()),
            CHART_HEIGHT - PAD_BOTTOM + 16.0,
            html_escape(label)
        ));
    }

    for (name, color, band) in references {
        let y = y_at(*band);
        svg.push_str(&format!(
            "  <line x1=\"{PAD_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{color}\" stroke-dasharray=\"4 4\"><title>{} target {band:.1}</title></line>\n",
            CHART_WIDTH - PAD_RIGHT,
            html_escape(name)
        ));
    }

    for s in series {
        let points: Vec<String> = s
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| format!("{:.1},{:.1}", x_at(i, labels.len()), y_at(v))))
            .collect();
        if points.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            "  <polyline fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"{}\"><title>{}</title></polyline>\n",
            s.color,
            points.join(" "),
            html_escape(s.name)
        ));
    }

    svg.push_str("</svg>\n");

    svg.push_str("<p class=\"legend\">");
    for s in series {
        svg.push_str(&format!(
            "<span style=\"color:{}\">&#9632;</span> {} ",
            s.color,
            html_escape(s.name)
        ));
    }
    svg.push_str("</p>\n");
    svg
}

fn skill_chart(points: &[TrendPoint], targets: &Targets) -> String {
    let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    let series = [
        Series {
            name: "Listening",
            color: "#0ea5e9",
            values: points.iter().map(|p| Some(p.listening)).collect(),
        },
        Series {
            name: "Reading",
            color: "#22c55e",
            values: points.iter().map(|p| Some(p.reading)).collect(),
        },
        Series {
            name: "Writing",
            color: "#eab308",
            values: points.iter().map(|p| Some(p.writing)).collect(),
        },
        Series {
            name: "Overall",
            color: "#6366f1",
            values: points.iter().map(|p| Some(p.overall)).collect(),
        },
    ];
    let references = [
        ("Listening", "#0ea5e9", targets.listening),
        ("Reading", "#22c55e", targets.reading),
        ("Writing", "#eab308", targets.writing),
    ];
    line_chart(&labels, &series, &references)
}

fn writing_chart(points: &[TrendPoint]) -> String {
    let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    let series = [
        Series {
            name: "Task 1",
            color: "#f97316",
            values: points.iter().map(|p| p.task1).collect(),
        },
        Series {
            name: "Task 2",
            color: "#ef4444",
            values: points.iter().map(|p| p.task2).collect(),
        },
        Series {
            name: "Writing",
            color: "#eab308",
            values: points.iter().map(|p| Some(p.writing)).collect(),
        },
    ];
    line_chart(&labels, &series, &[])
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --pending: #f0f9ff; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --pending: #0c4a6e; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty, .legend { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.pending { background: var(--pending); }
.heatmap { display: grid; grid-template-columns: repeat(20, 14px); gap: 3px; }
.cell { width: 14px; height: 14px; border-radius: 3px; }
.level-0 { background: #f1f5f9; }
.level-1 { background: #bae6fd; }
.level-2 { background: #38bdf8; }
.level-3 { background: #0284c7; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
