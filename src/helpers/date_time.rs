//! Windows FILETIME to POSIX timestamp conversion (SPEC_FULL.md §4.7).

const EPOCH_DIFFERENCE_SECONDS: i64 = 11_644_473_600;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Converts a 100-nanosecond-tick FILETIME (since 1601-01-01) to POSIX seconds since the Unix
/// epoch. Returns `None` for a zero FILETIME, the conventional "not set" sentinel.
pub fn filetime_to_posix(filetime: u64) -> Option<i64> {
    if filetime == 0 {
        return None;
    }
    Some(filetime as i64 / TICKS_PER_SECOND - EPOCH_DIFFERENCE_SECONDS)
}
