//! Study schedule projection.
//!
//! The study plan is one practice test every two days with Sundays off.
//! Projection walks the records in order with a single cursor date and never
//! looks ahead: if the cursor sits on a Sunday it moves to Monday before the
//! record takes it, and the next record starts two days after whatever date
//! was taken. All dates are UTC calendar days.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::model::{TestRecord, FIRST_BOOK, LAST_BOOK, TESTS_PER_BOOK};

/// Days between two consecutive practice tests.
pub const CADENCE_DAYS: i64 = 2;

/// A record together with the day it is planned for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedRecord<'a> {
    pub record: &'a TestRecord,
    pub projected_date: NaiveDate,
}

/// Assign a planned date to every record, in record order.
pub fn project_dates(records: &[TestRecord], start: NaiveDate) -> Vec<ProjectedRecord<'_>> {
    let mut cursor = start;
    records
        .iter()
        .map(|record| {
            if cursor.weekday() == Weekday::Sun {
                cursor += Duration::days(1);
            }
            let projected = ProjectedRecord {
                record,
                projected_date: cursor,
            };
            cursor += Duration::days(CADENCE_DAYS);
            projected
        })
        .collect()
}

/// Planned date of the last test, if there is one.
pub fn finish_date(projected: &[ProjectedRecord<'_>]) -> Option<NaiveDate> {
    projected.last().map(|p| p.projected_date)
}

/// Completion summary for one book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookProgress<'a> {
    pub book: u32,
    pub completed: u32,
    pub total: u32,
    pub tests: Vec<ProjectedRecord<'a>>,
}

impl BookProgress<'_> {
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// One entry per library book, in book order.
pub fn book_progress<'a>(projected: &[ProjectedRecord<'a>]) -> Vec<BookProgress<'a>> {
    (FIRST_BOOK..=LAST_BOOK)
        .map(|book| {
            let tests: Vec<ProjectedRecord<'a>> = projected
                .iter()
                .filter(|p| p.record.book_number == book)
                .copied()
                .collect();
            let completed = tests.iter().filter(|p| p.record.is_completed).count() as u32;
            BookProgress {
                book,
                completed,
                total: TESTS_PER_BOOK,
                tests,
            }
        })
        .collect()
}

/// The first record, in schedule order, that has not been completed.
pub fn next_pending<'p, 'a>(projected: &'p [ProjectedRecord<'a>]) -> Option<&'p ProjectedRecord<'a>> {
    projected.iter().find(|p| !p.record.is_completed)
}

/// Countdown state for the next pending test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The next test is planned for today.
    Today,
    /// The planned day has passed; whole days elapsed since its midnight.
    Overdue { days: i64 },
    /// Time left until the planned day's midnight.
    Upcoming { days: i64, hours: i64, minutes: i64 },
    /// Nothing left to schedule.
    AllComplete,
}

impl Status {
    /// Short banner text.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Today => "TODAY",
            Status::Overdue { .. } => "OVERDUE",
            Status::Upcoming { .. } => "NEXT TEST",
            Status::AllComplete => "ALL COMPLETE",
        }
    }

    /// Countdown text; empty once everything is done.
    pub fn detail(&self) -> String {
        match self {
            Status::Today => "Test Day".to_string(),
            Status::Overdue { days } => format!("{days} days late"),
            Status::Upcoming {
                days,
                hours,
                minutes,
            } => format!("{days}d {hours}h {minutes}m"),
            Status::AllComplete => String::new(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::AllComplete => write!(f, "All tests completed!"),
            other => write!(f, "{}: {}", other.label(), other.detail()),
        }
    }
}

/// UTC midnight at the start of `date`.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Compare `now` against the next pending test.
pub fn status_for(now: DateTime<Utc>, next: Option<&ProjectedRecord<'_>>) -> Status {
    let Some(next) = next else {
        return Status::AllComplete;
    };

    let today = now.date_naive();
    let target = midnight(next.projected_date);

    if today == next.projected_date {
        Status::Today
    } else if today > next.projected_date {
        Status::Overdue {
            days: (now - target).num_days(),
        }
    } else {
        let left = target - now;
        Status::Upcoming {
            days: left.num_days(),
            hours: left.num_hours() % 24,
            minutes: left.num_minutes() % 60,
        }
    }
}
