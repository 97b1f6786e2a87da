//! Weekday arithmetic for milestone dates
//!
//! Milestones are counted backwards from the presentation date in Monday to
//! Friday steps. Weekends are skipped without consuming the count. A
//! milestone may additionally be pinned to a weekday, in which case the date
//! keeps moving back until it lands on that day.

use crate::MilestoneTemplate;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Check if a date falls Monday through Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekday for an ISO number (1 = Monday .. 7 = Sunday)
pub fn weekday_from_iso(number: u32) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Step back `workdays` Monday-Friday days from `date`.
///
/// `workdays == 0` returns `date` unchanged, even on a weekend.
pub fn subtract_weekdays(date: NaiveDate, workdays: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = workdays;
    while remaining > 0 {
        current = current - Days::new(1);
        if is_weekday(current) {
            remaining -= 1;
        }
    }
    current
}

/// Step back from `date` until it falls on `weekday` (unchanged if it does)
pub fn align_to_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let mut current = date;
    while current.weekday() != weekday {
        current = current - Days::new(1);
    }
    current
}

/// Date of a milestone for a given presentation date
pub fn milestone_date(presentation: NaiveDate, template: &MilestoneTemplate) -> NaiveDate {
    let offset = subtract_weekdays(presentation, template.workdays_before);
    match template.specific_weekday {
        Some(weekday) => align_to_weekday(offset, weekday),
        None => offset,
    }
}
