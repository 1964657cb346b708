//! Progress analytics: trend series, averages, activity heatmap, target gaps.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TestRecord;

/// Default number of days shown in the activity heatmap.
pub const DEFAULT_HEATMAP_DAYS: u32 = 60;

/// Band the student is aiming for in each skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "default_listening")]
    pub listening: f64,
    #[serde(default = "default_reading")]
    pub reading: f64,
    #[serde(default = "default_writing")]
    pub writing: f64,
}

fn default_listening() -> f64 {
    8.0
}
fn default_reading() -> f64 {
    9.0
}
fn default_writing() -> f64 {
    7.0
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            listening: default_listening(),
            reading: default_reading(),
            writing: default_writing(),
        }
    }
}

/// A skill with a target band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Listening,
    Reading,
    Writing,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::Listening => write!(f, "Listening"),
            Skill::Reading => write!(f, "Reading"),
            Skill::Writing => write!(f, "Writing"),
        }
    }
}

/// One completed test on the progression chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub listening: f64,
    pub reading: f64,
    pub writing: f64,
    pub overall: f64,
    pub task1: Option<f64>,
    pub task2: Option<f64>,
}

impl TrendPoint {
    pub fn band(&self, skill: Skill) -> f64 {
        match skill {
            Skill::Listening => self.listening,
            Skill::Reading => self.reading,
            Skill::Writing => self.writing,
        }
    }
}

/// Completed tests in the order they were taken.
pub fn trend(records: &[TestRecord]) -> Vec<TrendPoint> {
    let mut completed: Vec<&TestRecord> = records.iter().filter(|r| r.is_completed).collect();
    completed.sort_by_key(|r| r.completed_date);
    completed
        .into_iter()
        .map(|r| TrendPoint {
            label: r.label(),
            completed_at: r.completed_date,
            listening: r.calculated_band.listening,
            reading: r.calculated_band.reading,
            writing: r.calculated_band.writing,
            overall: r.calculated_band.overall,
            task1: r.scores.writing_task1,
            task2: r.scores.writing_task2,
        })
        .collect()
}

/// Headline numbers for the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub completed: usize,
    pub resolved: usize,
    /// Completed tests whose mistakes have not been reviewed.
    pub pending_review: usize,
    pub avg_overall: Option<f64>,
    pub avg_listening: Option<f64>,
    pub avg_reading: Option<f64>,
    pub avg_writing: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn summarize(records: &[TestRecord]) -> Summary {
    let completed: Vec<&TestRecord> = records.iter().filter(|r| r.is_completed).collect();
    let avg = |pick: fn(&TestRecord) -> f64| mean(completed.iter().map(|r| pick(r)));

    Summary {
        completed: completed.len(),
        resolved: records.iter().filter(|r| r.is_resolved).count(),
        pending_review: records.iter().filter(|r| r.needs_review()).count(),
        avg_overall: avg(|r| r.calculated_band.overall),
        avg_listening: avg(|r| r.calculated_band.listening),
        avg_reading: avg(|r| r.calculated_band.reading),
        avg_writing: avg(|r| r.calculated_band.writing),
    }
}

/// Tests completed on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: usize,
}

impl DayActivity {
    /// Heatmap shade: 0 for an idle day up to 3 for three or more tests.
    pub fn level(&self) -> u8 {
        self.count.min(3) as u8
    }
}

/// Activity for the `days` days ending with `today`, oldest first.
pub fn activity(records: &[TestRecord], today: NaiveDate, days: u32) -> Vec<DayActivity> {
    (0..i64::from(days))
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let count = records
                .iter()
                .filter(|r| r.completed_date.map(|d| d.date_naive()) == Some(date))
                .count();
            DayActivity { date, count }
        })
        .collect()
}

/// Distance between the latest band in a skill and its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGap {
    pub skill: Skill,
    pub latest: f64,
    pub target: f64,
}

impl TargetGap {
    /// Positive when the target is met or beaten.
    pub fn gap(&self) -> f64 {
        self.latest - self.target
    }

    pub fn is_met(&self) -> bool {
        self.gap() >= 0.0
    }
}

/// Gaps against the most recent completed test; empty when nothing is done.
pub fn target_gaps(points: &[TrendPoint], targets: &Targets) -> Vec<TargetGap> {
    let Some(latest) = points.last() else {
        return Vec::new();
    };
    [
        (Skill::Listening, targets.listening),
        (Skill::Reading, targets.reading),
        (Skill::Writing, targets.writing),
    ]
    .into_iter()
    .map(|(skill, target)| TargetGap {
        skill,
        latest: latest.band(skill),
        target,
    })
    .collect()
}
