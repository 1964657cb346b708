//! bandtrack-core: Score conversion, scheduling, and persistence.
//!
//! This crate defines the record model, the band conversion rules, the
//! study schedule, and the state controller that the rest of bandtrack
//! builds on.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod schedule;
pub mod scoring;
pub mod store;
pub mod ticker;
pub mod tracker;

pub use clock::Clock;
pub use error::{ImportError, RecordIdError, ScoreInputError, StoreError, TrackerError};
pub use model::{AppState, CalculatedBand, RecordId, ScoreInput, Tab, TestRecord, UiState};
pub use store::{BlobStore, FileStore, MemoryStore, Persistence};
pub use tracker::Tracker;
