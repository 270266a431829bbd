//! Chronological fill ordering for matching.

use crate::domain::FillRecord;

/// Sort fills by time ascending.
///
/// The sort is stable: fills sharing a timestamp keep the order the exchange
/// returned them in, which is the order they are matched in.
pub fn sort_fills_chronological(fills: &mut [FillRecord]) {
    fills.sort_by_key(|fill| fill.time_ms);
}
