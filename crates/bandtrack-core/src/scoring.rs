//! Raw-to-band conversion and composite band scores.
//!
//! Listening and reading are marked out of 40 and converted with a fixed
//! lookup table. Writing is the 2:1 weighted mean of the two task bands, and
//! the overall band is the plain mean of the three skills. Every composite is
//! rounded to the nearest half band.

use crate::model::{CalculatedBand, ScoreInput};

/// Highest raw score for listening and reading.
pub const MAX_RAW: u8 = 40;

/// Highest band on the scale.
pub const MAX_BAND: f64 = 9.0;

/// Academic listening/reading conversion, highest raw score first.
///
/// Raw scores below 16 are not listed and fall through to [`fallback_band`].
pub const RAW_TO_BAND: &[(u8, f64)] = &[
    (40, 9.0),
    (39, 9.0),
    (38, 8.5),
    (37, 8.5),
    (36, 8.0),
    (35, 8.0),
    (34, 7.5),
    (33, 7.5),
    (32, 7.5),
    (31, 7.0),
    (30, 7.0),
    (29, 6.5),
    (28, 6.5),
    (27, 6.5),
    (26, 6.0),
    (25, 6.0),
    (24, 6.0),
    (23, 6.0),
    (22, 5.5),
    (21, 5.5),
    (20, 5.5),
    (19, 5.5),
    (18, 5.0),
    (17, 5.0),
    (16, 5.0),
];

/// Band for a raw score the table does not list.
fn fallback_band(raw: u8) -> f64 {
    if raw >= 13 {
        4.5
    } else if raw >= 10 {
        4.0
    } else {
        3.5
    }
}

/// Round to the nearest half band.
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Convert a listening or reading raw score to a band.
///
/// Returns 0 for an absent score. Callers validate the range beforehand.
pub fn band_from_raw(raw: Option<u8>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    RAW_TO_BAND
        .iter()
        .find(|(r, _)| *r == raw)
        .map(|(_, band)| *band)
        .unwrap_or_else(|| fallback_band(raw))
}

/// Combine the two writing task bands, task 2 weighted double.
///
/// Absent tasks count as 0; if both are 0 the writing band is unset (0).
pub fn combined_writing_band(task1: Option<f64>, task2: Option<f64>) -> f64 {
    let t1 = task1.unwrap_or(0.0);
    let t2 = task2.unwrap_or(0.0);
    if t1 == 0.0 && t2 == 0.0 {
        return 0.0;
    }
    round_to_half((t1 + 2.0 * t2) / 3.0)
}

/// Unweighted mean of the three skill bands, rounded to the nearest half.
pub fn overall_band(listening: f64, reading: f64, writing: f64) -> f64 {
    round_to_half((listening + reading + writing) / 3.0)
}

/// Derive every band from a score input.
pub fn calculate(scores: &ScoreInput) -> CalculatedBand {
    let listening = band_from_raw(scores.listening_raw);
    let reading = band_from_raw(scores.reading_raw);
    let writing = combined_writing_band(scores.writing_task1, scores.writing_task2);
    CalculatedBand {
        listening,
        reading,
        writing,
        overall: overall_band(listening, reading, writing),
    }
}
