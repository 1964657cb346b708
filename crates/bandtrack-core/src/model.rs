//! Core data model types for bandtrack.
//!
//! The persisted JSON uses camelCase keys so that backups stay compatible
//! with the blob layout the tracker has always written.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RecordIdError, ScoreInputError};
use crate::scoring::{self, MAX_BAND, MAX_RAW};

/// First book in the practice library.
pub const FIRST_BOOK: u32 = 5;
/// Last book in the practice library (inclusive).
pub const LAST_BOOK: u32 = 20;
/// Every book holds four practice tests.
pub const TESTS_PER_BOOK: u32 = 4;

/// Anchor used when no start date has been stored: Monday 2026-01-05, 00:00 UTC.
pub const DEFAULT_START_TIMESTAMP: i64 = 1_767_571_200;

/// The default scheduling anchor.
pub fn default_start_date() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_START_TIMESTAMP, 0).unwrap_or_default()
}

/// Returns `true` if `book` belongs to the practice library.
pub fn is_library_book(book: u32) -> bool {
    (FIRST_BOOK..=LAST_BOOK).contains(&book)
}

/// Scores as entered by the user. `None` means "not yet entered".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    /// Listening correct answers out of 40.
    pub listening_raw: Option<u8>,
    /// Reading correct answers out of 40.
    pub reading_raw: Option<u8>,
    /// Writing task 1 band.
    pub writing_task1: Option<f64>,
    /// Writing task 2 band.
    pub writing_task2: Option<f64>,
}

impl ScoreInput {
    /// Parse the four form fields. Empty strings leave a field unset.
    pub fn from_form(
        listening: &str,
        reading: &str,
        task1: &str,
        task2: &str,
    ) -> Result<Self, ScoreInputError> {
        let scores = Self {
            listening_raw: parse_raw("listening", listening)?,
            reading_raw: parse_raw("reading", reading)?,
            writing_task1: parse_band("writing task 1", task1)?,
            writing_task2: parse_band("writing task 2", task2)?,
        };
        scores.validate()?;
        Ok(scores)
    }

    /// Check every present field against its range.
    pub fn validate(&self) -> Result<(), ScoreInputError> {
        check_raw("listening", self.listening_raw)?;
        check_raw("reading", self.reading_raw)?;
        check_band("writing task 1", self.writing_task1)?;
        check_band("writing task 2", self.writing_task2)?;
        Ok(())
    }

    /// Unset every field that is out of range, returning what was wrong.
    pub fn clear_invalid(&mut self) -> Vec<ScoreInputError> {
        let mut cleared = Vec::new();
        if let Err(e) = check_raw("listening", self.listening_raw) {
            self.listening_raw = None;
            cleared.push(e);
        }
        if let Err(e) = check_raw("reading", self.reading_raw) {
            self.reading_raw = None;
            cleared.push(e);
        }
        if let Err(e) = check_band("writing task 1", self.writing_task1) {
            self.writing_task1 = None;
            cleared.push(e);
        }
        if let Err(e) = check_band("writing task 2", self.writing_task2) {
            self.writing_task2 = None;
            cleared.push(e);
        }
        cleared
    }

    /// All four fields have been entered.
    pub fn is_complete(&self) -> bool {
        self.listening_raw.is_some()
            && self.reading_raw.is_some()
            && self.writing_task1.is_some()
            && self.writing_task2.is_some()
    }
}

fn parse_raw(field: &'static str, input: &str) -> Result<Option<u8>, ScoreInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let value: u32 = input.parse().map_err(|_| ScoreInputError::NotANumber {
        field,
        input: input.to_string(),
    })?;
    match u8::try_from(value) {
        Ok(raw) if raw <= MAX_RAW => Ok(Some(raw)),
        _ => Err(ScoreInputError::RawOutOfRange { field, value }),
    }
}

fn parse_band(field: &'static str, input: &str) -> Result<Option<f64>, ScoreInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ScoreInputError::NotANumber {
            field,
            input: input.to_string(),
        })
}

fn check_raw(field: &'static str, raw: Option<u8>) -> Result<(), ScoreInputError> {
    match raw {
        Some(value) if value > MAX_RAW => Err(ScoreInputError::RawOutOfRange {
            field,
            value: u32::from(value),
        }),
        _ => Ok(()),
    }
}

fn check_band(field: &'static str, band: Option<f64>) -> Result<(), ScoreInputError> {
    match band {
        Some(value)
            if !value.is_finite()
                || !(0.0..=MAX_BAND).contains(&value)
                || (value * 2.0).fract() != 0.0 =>
        {
            Err(ScoreInputError::InvalidBand { field, value })
        }
        _ => Ok(()),
    }
}

/// Bands derived from a `ScoreInput`. Zero means "not computed".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculatedBand {
    pub listening: f64,
    pub reading: f64,
    pub writing: f64,
    pub overall: f64,
}

/// Stable identifier of a practice test, rendered as `b{book}-t{test}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId {
    pub book: u32,
    pub test: u32,
}

impl RecordId {
    pub fn new(book: u32, test: u32) -> Self {
        Self { book, test }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}-t{}", self.book, self.test)
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecordIdError(s.to_string());
        let (book, test) = s.split_once('-').ok_or_else(invalid)?;
        let book = book
            .strip_prefix('b')
            .and_then(|b| b.parse().ok())
            .ok_or_else(invalid)?;
        let test = test
            .strip_prefix('t')
            .and_then(|t| t.parse().ok())
            .ok_or_else(invalid)?;
        Ok(Self { book, test })
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

/// One practice test in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: RecordId,
    pub book_number: u32,
    pub test_number: u32,
    #[serde(default)]
    pub is_completed: bool,
    /// First time scores were saved. Later edits leave it alone.
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub resolved_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scores: ScoreInput,
    #[serde(default)]
    pub calculated_band: CalculatedBand,
}

impl TestRecord {
    /// A fresh, untouched record.
    pub fn new(book: u32, test: u32) -> Self {
        Self {
            id: RecordId::new(book, test),
            book_number: book,
            test_number: test,
            is_completed: false,
            completed_date: None,
            is_resolved: false,
            resolved_date: None,
            scores: ScoreInput::default(),
            calculated_band: CalculatedBand::default(),
        }
    }

    /// Store new scores and the bands derived from them in one step.
    ///
    /// The completion date is stamped only the first time.
    pub fn record_scores(&mut self, scores: ScoreInput, now: DateTime<Utc>) {
        self.calculated_band = scoring::calculate(&scores);
        self.scores = scores;
        self.is_completed = true;
        if self.completed_date.is_none() {
            self.completed_date = Some(now);
        }
    }

    /// Flip the review flag, stamping or clearing its date.
    pub fn toggle_resolved(&mut self, now: DateTime<Utc>) {
        self.is_resolved = !self.is_resolved;
        self.resolved_date = self.is_resolved.then_some(now);
    }

    /// Re-derive bands from the stored scores.
    pub fn refresh_bands(&mut self) {
        self.calculated_band = scoring::calculate(&self.scores);
    }

    /// Mistake review is due the day after the test was completed.
    pub fn resolve_due(&self) -> Option<DateTime<Utc>> {
        self.completed_date.map(|d| d + Duration::days(1))
    }

    /// Completed but mistakes not reviewed yet.
    pub fn needs_review(&self) -> bool {
        self.is_completed && !self.is_resolved
    }

    /// Short label used in charts, e.g. `B7T2`.
    pub fn label(&self) -> String {
        format!("B{}T{}", self.book_number, self.test_number)
    }
}

/// Every test in the library, book-major then test-minor.
///
/// Scheduling relies on this order; records are never re-sorted.
pub fn generate_initial_records() -> Vec<TestRecord> {
    (FIRST_BOOK..=LAST_BOOK)
        .flat_map(|book| (1..=TESTS_PER_BOOK).map(move |test| TestRecord::new(book, test)))
        .collect()
}

/// Top-level view the presentation layer last showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Books,
    Analytics,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Books => write!(f, "books"),
            Tab::Analytics => write!(f, "analytics"),
        }
    }
}

/// View position restored across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub active_tab: Tab,
    pub selected_book: Option<u32>,
}

/// Everything the tracker persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Anchor for the study schedule.
    pub start_date: DateTime<Utc>,
    /// Ordered records; the order is the schedule order.
    pub records: Vec<TestRecord>,
    #[serde(default)]
    pub ui_state: UiState,
}

impl AppState {
    /// A brand-new state anchored at `start_date`.
    pub fn fresh(start_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            records: generate_initial_records(),
            ui_state: UiState::default(),
        }
    }

    pub fn record(&self, id: RecordId) -> Option<&TestRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn record_mut(&mut self, id: RecordId) -> Option<&mut TestRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Re-derive every record's bands from its scores.
    pub fn refresh_bands(&mut self) {
        for record in &mut self.records {
            record.refresh_bands();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::fresh(default_start_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn default_start_is_a_monday() {
        let start = default_start_date();
        assert_eq!(start.to_rfc3339(), "2026-01-05T00:00:00+00:00");
        assert_eq!(start.weekday(), Weekday::Mon);
    }

    #[test]
    fn initial_records_are_book_major() {
        let records = generate_initial_records();
        assert_eq!(records.len(), ((LAST_BOOK - FIRST_BOOK + 1) * TESTS_PER_BOOK) as usize);
        assert_eq!(records[0].id.to_string(), "b5-t1");
        assert_eq!(records[3].id.to_string(), "b5-t4");
        assert_eq!(records[4].id.to_string(), "b6-t1");
        assert_eq!(records.last().unwrap().id.to_string(), "b20-t4");
        assert!(records.iter().all(|r| !r.is_completed && !r.is_resolved));
        assert!(records.iter().all(|r| r.calculated_band == CalculatedBand::default()));
    }

    #[test]
    fn record_id_display_and_parse() {
        let id = RecordId::new(12, 3);
        assert_eq!(id.to_string(), "b12-t3");
        assert_eq!("b12-t3".parse::<RecordId>().unwrap(), id);
        assert!("12-3".parse::<RecordId>().is_err());
        assert!("b12t3".parse::<RecordId>().is_err());
        assert!("bx-t1".parse::<RecordId>().is_err());
    }

    #[test]
    fn form_parsing_accepts_blanks() {
        let scores = ScoreInput::from_form("31", "", " 6.5 ", "").unwrap();
        assert_eq!(scores.listening_raw, Some(31));
        assert_eq!(scores.reading_raw, None);
        assert_eq!(scores.writing_task1, Some(6.5));
        assert!(!scores.is_complete());
    }

    #[test]
    fn form_parsing_rejects_bad_values() {
        assert!(matches!(
            ScoreInput::from_form("41", "", "", ""),
            Err(ScoreInputError::RawOutOfRange { value: 41, .. })
        ));
        assert!(matches!(
            ScoreInput::from_form("-1", "", "", ""),
            Err(ScoreInputError::NotANumber { .. })
        ));
        assert!(matches!(
            ScoreInput::from_form("", "", "9.5", ""),
            Err(ScoreInputError::InvalidBand { .. })
        ));
        assert!(matches!(
            ScoreInput::from_form("", "", "", "6.3"),
            Err(ScoreInputError::InvalidBand { .. })
        ));
        assert!(matches!(
            ScoreInput::from_form("", "", "NaN", ""),
            Err(ScoreInputError::InvalidBand { .. })
        ));
        assert!(matches!(
            ScoreInput::from_form("abc", "", "", ""),
            Err(ScoreInputError::NotANumber { .. })
        ));
    }

    #[test]
    fn clear_invalid_unsets_only_bad_fields() {
        let mut scores = ScoreInput {
            listening_raw: Some(31),
            reading_raw: Some(52),
            writing_task1: Some(6.3),
            writing_task2: Some(7.0),
        };
        let cleared = scores.clear_invalid();
        assert_eq!(cleared.len(), 2);
        assert_eq!(
            scores,
            ScoreInput {
                listening_raw: Some(31),
                reading_raw: None,
                writing_task1: None,
                writing_task2: Some(7.0),
            }
        );
        assert!(scores.clear_invalid().is_empty());
    }

    #[test]
    fn record_scores_keeps_first_completion_date() {
        let mut record = TestRecord::new(5, 1);
        let first = default_start_date();
        let later = first + Duration::days(3);
        let scores = ScoreInput::from_form("30", "30", "6", "6").unwrap();

        record.record_scores(scores, first);
        assert!(record.is_completed);
        assert_eq!(record.completed_date, Some(first));
        assert_eq!(record.calculated_band.listening, 7.0);

        let better = ScoreInput::from_form("39", "39", "7", "7").unwrap();
        record.record_scores(better, later);
        assert_eq!(record.completed_date, Some(first));
        assert_eq!(record.calculated_band.listening, 9.0);
        assert_eq!(record.resolve_due(), Some(first + Duration::days(1)));
    }

    #[test]
    fn toggle_resolved_sets_and_clears_date() {
        let mut record = TestRecord::new(5, 1);
        let now = default_start_date();
        record.toggle_resolved(now);
        assert!(record.is_resolved);
        assert_eq!(record.resolved_date, Some(now));
        record.toggle_resolved(now);
        assert!(!record.is_resolved);
        assert_eq!(record.resolved_date, None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let state = AppState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("startDate").is_some());
        assert_eq!(json["uiState"]["activeTab"], "books");
        assert!(json["uiState"]["selectedBook"].is_null());
        let first = &json["records"][0];
        assert_eq!(first["id"], "b5-t1");
        assert_eq!(first["bookNumber"], 5);
        assert!(first["completedDate"].is_null());
        assert!(first["scores"]["listeningRaw"].is_null());
        assert_eq!(first["calculatedBand"]["overall"], 0.0);
    }

    #[test]
    fn deserializes_original_blob_shape() {
        let json = r#"{
            "id": "b7-t2", "bookNumber": 7, "testNumber": 2,
            "isCompleted": true, "completedDate": "2026-01-09T18:30:00.000Z",
            "isResolved": false, "resolvedDate": null,
            "scores": {"listeningRaw": 33, "readingRaw": 36, "writingTask1": 6, "writingTask2": 6.5},
            "calculatedBand": {"listening": 7.5, "reading": 8, "writing": 6.5, "overall": 7.5}
        }"#;
        let record: TestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::new(7, 2));
        assert_eq!(record.scores.writing_task1, Some(6.0));
        assert!(record.completed_date.is_some());
    }
}
