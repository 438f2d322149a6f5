use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, AppResult};
use crate::models::shift::format_shift_time;

/// Half-open interval test: `[a_start, a_end)` against `[b_start, b_end)`.
/// Shifts that merely touch at a boundary do not overlap.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Signed minutes from `from` to `to` within one day; negative when `to`
/// precedes `from`.
pub fn gap_minutes(from: NaiveTime, to: NaiveTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

pub fn combine(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Signed minutes from `earlier` to `later` across day boundaries.
pub fn minutes_between(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    later.signed_duration_since(earlier).num_minutes()
}

pub fn ensure_window(start: NaiveTime, end: NaiveTime) -> AppResult<()> {
    if end <= start {
        Err(AppError::validation(
            "shift start time must be before end time",
        ))
    } else {
        Ok(())
    }
}

pub fn format_window(start: NaiveTime, end: NaiveTime) -> String {
    format!("{}-{}", format_shift_time(start), format_shift_time(end))
}
