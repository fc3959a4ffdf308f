//! Lote (batch sequence) number generation

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};

/// Digits in a lote number
pub const LOTE_NUMBER_LEN: usize = 12;

static LOTE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generates a 12-digit lote number from the current time
///
/// The last 10 digits of the epoch milliseconds are followed by a 2-digit
/// process-wide rolling counter, so chunks split from one group in the same
/// millisecond still get distinct numbers.
pub fn next_lote_number() -> String {
    lote_number_at(Utc::now())
}

/// Same as [`next_lote_number`] at a fixed instant
pub fn lote_number_at(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().unsigned_abs() % 10_000_000_000;
    let seq = LOTE_COUNTER.fetch_add(1, Ordering::Relaxed) % 100;
    format!("{millis:010}{seq:02}")
}
