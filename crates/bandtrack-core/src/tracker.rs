//! Application state controller.
//!
//! `Tracker` owns the canonical `AppState`. Every mutation validates its
//! input before touching the state, so a failed call leaves everything as it
//! was, and every successful mutation is written back through the
//! persistence gateway before returning.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::TrackerError;
use crate::model::{is_library_book, AppState, RecordId, ScoreInput, Tab};
use crate::schedule::{self, BookProgress, ProjectedRecord, Status};
use crate::store::{decode_state, BlobStore, Persistence};

/// File name suggested for a backup taken on `today`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("ielts_tracker_backup_{}.json", today.format("%Y-%m-%d"))
}

/// Owner of the tracker state.
#[derive(Debug)]
pub struct Tracker<S> {
    state: AppState,
    persistence: Persistence<S>,
    clock: Clock,
}

impl<S: BlobStore> Tracker<S> {
    /// Load state from `store`, falling back to a fresh library.
    pub fn open(store: S, clock: Clock) -> Self {
        let persistence = Persistence::new(store);
        let state = persistence.load();
        Self {
            state,
            persistence,
            clock,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    fn commit(&mut self) {
        self.persistence.save(&self.state);
    }

    fn position(&self, id: RecordId) -> Result<usize, TrackerError> {
        self.state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| TrackerError::UnknownRecord(id.to_string()))
    }

    /// Record scores for a test and mark it completed.
    ///
    /// Bands are recomputed from `scores`; the completion date is kept if
    /// the test was already completed.
    pub fn save_score(
        &mut self,
        id: RecordId,
        scores: ScoreInput,
    ) -> Result<&AppState, TrackerError> {
        let index = self.position(id)?;
        scores.validate()?;
        if !scores.is_complete() {
            return Err(TrackerError::IncompleteScores);
        }

        let now = self.clock.now();
        let record = &mut self.state.records[index];
        record.record_scores(scores, now);
        tracing::debug!(
            "saved {id}: overall {} (L {} R {} W {})",
            record.calculated_band.overall,
            record.calculated_band.listening,
            record.calculated_band.reading,
            record.calculated_band.writing
        );

        self.commit();
        Ok(&self.state)
    }

    /// Flip the mistake-review flag of a test.
    pub fn toggle_resolve(&mut self, id: RecordId) -> Result<&AppState, TrackerError> {
        let index = self.position(id)?;
        let now = self.clock.now();
        let record = &mut self.state.records[index];
        record.toggle_resolved(now);
        tracing::debug!("{id} resolved: {}", record.is_resolved);

        self.commit();
        Ok(&self.state)
    }

    /// Replace the whole state with a backup.
    ///
    /// Either the backup is accepted in full or nothing changes.
    pub fn import_state(&mut self, payload: &str) -> Result<&AppState, TrackerError> {
        let imported = decode_state(payload)?;
        tracing::info!("imported backup with {} records", imported.records.len());
        self.state = imported;
        self.commit();
        Ok(&self.state)
    }

    /// Snapshot of the whole state, readable by `import_state`.
    pub fn export_state(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }

    /// Throw away all progress and restart the schedule from now.
    ///
    /// Callers must have asked the user for confirmation first.
    pub fn reset(&mut self) -> &AppState {
        let now = self.clock.now();
        self.state = AppState::fresh(now);
        tracing::info!("progress reset, new start date {now}");
        self.commit();
        &self.state
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        if self.state.ui_state.active_tab != tab {
            self.state.ui_state.active_tab = tab;
            self.commit();
        }
    }

    /// Open a book in the library view, or return to the library with `None`.
    pub fn select_book(&mut self, book: Option<u32>) -> Result<(), TrackerError> {
        if let Some(book) = book {
            if !is_library_book(book) {
                return Err(TrackerError::UnknownBook(book));
            }
        }
        let ui = &mut self.state.ui_state;
        if ui.active_tab != Tab::Books || ui.selected_book != book {
            ui.active_tab = Tab::Books;
            ui.selected_book = book;
            self.commit();
        }
        Ok(())
    }

    /// Every record with its planned date.
    pub fn projected(&self) -> Vec<ProjectedRecord<'_>> {
        schedule::project_dates(&self.state.records, self.state.start_date.date_naive())
    }

    pub fn finish_date(&self) -> Option<NaiveDate> {
        schedule::finish_date(&self.projected())
    }

    pub fn book_progress(&self) -> Vec<BookProgress<'_>> {
        schedule::book_progress(&self.projected())
    }

    /// Countdown state for the next pending test, as of the tracker's clock.
    pub fn status(&self) -> Status {
        let projected = self.projected();
        schedule::status_for(self.clock.now(), schedule::next_pending(&projected))
    }
}
