//! Occurrence arithmetic for recurring tasks and habits.
//!
//! Everything here is pure calendar-date computation: no I/O, no clock
//! reads, deterministic for a given input. The repository layer turns the
//! resulting dates into persisted occurrence rows.

use chrono::{Days, Months, NaiveDate};
use std::collections::HashSet;

use crate::models::RepeatCadence;

/// The k-th occurrence after `start`, i.e. `start + k * period`.
///
/// Month and year steps use calendar-aware addition: a rule anchored on the
/// 31st lands on the last day of shorter months and returns to the 31st
/// afterwards. Returns `None` only when the date arithmetic overflows
/// chrono's representable range.
pub fn nth_occurrence(start: NaiveDate, cadence: RepeatCadence, k: u32) -> Option<NaiveDate> {
    match cadence {
        RepeatCadence::Daily => start.checked_add_days(Days::new(u64::from(k))),
        RepeatCadence::Weekly => start.checked_add_days(Days::new(7 * u64::from(k))),
        RepeatCadence::Monthly => start.checked_add_months(Months::new(k)),
        RepeatCadence::Yearly => 12u32
            .checked_mul(k)
            .and_then(|months| start.checked_add_months(Months::new(months))),
    }
}

/// Expands a repeat cadence into the concrete occurrence dates between
/// `start` (exclusive) and `end` (inclusive).
///
/// The result is strictly ascending. An inverted range (`end < start`)
/// yields an empty sequence rather than an error; the anchor date itself is
/// never part of the output.
pub fn occurrences_between(
    start: NaiveDate,
    end: NaiveDate,
    cadence: RepeatCadence,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if end < start {
        return dates;
    }

    let mut k = 1;
    while let Some(date) = nth_occurrence(start, cadence, k) {
        if date > end {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates
}

/// First occurrence of the sequence anchored at `start` that is strictly
/// after `after`. Returns `None` when the arithmetic overflows.
pub fn next_occurrence_after(
    start: NaiveDate,
    cadence: RepeatCadence,
    after: NaiveDate,
) -> Option<NaiveDate> {
    let mut k = 1;
    loop {
        let date = nth_occurrence(start, cadence, k)?;
        if date > after {
            return Some(date);
        }
        k += 1;
    }
}

/// Number of consecutive cadence periods with a mark, counting back from
/// `today`. An unmarked `today` does not break the streak; the walk then
/// starts one period earlier.
pub fn current_streak(
    marks: &HashSet<NaiveDate>,
    cadence: RepeatCadence,
    today: NaiveDate,
) -> u32 {
    let step_back = |date: NaiveDate| -> Option<NaiveDate> {
        match cadence {
            RepeatCadence::Daily => date.checked_sub_days(Days::new(1)),
            RepeatCadence::Weekly => date.checked_sub_days(Days::new(7)),
            RepeatCadence::Monthly => date.checked_sub_months(Months::new(1)),
            RepeatCadence::Yearly => date.checked_sub_months(Months::new(12)),
        }
    };

    let mut cursor = if marks.contains(&today) {
        today
    } else {
        match step_back(today) {
            Some(date) => date,
            None => return 0,
        }
    };

    let mut streak = 0;
    while marks.contains(&cursor) {
        streak += 1;
        match step_back(cursor) {
            Some(date) => cursor = date,
            None => break,
        }
    }
    streak
}
