//! Derivation of monthly availability from recurring office hours.
use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Utc};
use log::debug;

use super::models::advisor_model::{Advisor, OfficeDay, OfficeHours, YearMonth};

/// A booked time range on a specific date.
pub type BusySlot = (NaiveDate, String);

/// Every day of `month` whose weekday has an office hours entry, ascending.
pub fn derive_available_days(office_hours: &OfficeHours, month: YearMonth) -> BTreeSet<u32> {
    month
        .days()
        .filter(|date| office_hours.contains(OfficeDay::of(*date)))
        .map(|date| date.day())
        .collect()
}

/// The slot booked on the first available day of `month`, using that day's office hours.
pub fn derive_starter_busy_slot(
    office_hours: &OfficeHours,
    available_days: &BTreeSet<u32>,
    month: YearMonth,
) -> Option<BusySlot> {
    let first_day = month.date(*available_days.first()?)?;
    let time_range = office_hours.get(OfficeDay::of(first_day))?;
    Some((first_day, time_range.to_owned()))
}

/// Writes derived values into `advisor.calendar[month]`.
///
/// `available_days` replaces whatever the month held before. The starter slot
/// is appended to the busy slots of its date unless that exact range is
/// already booked there, so repeated runs leave the month unchanged.
pub fn apply_calendar_update(
    mut advisor: Advisor,
    month: YearMonth,
    available_days: BTreeSet<u32>,
    starter_slot: Option<BusySlot>,
) -> Advisor {
    let record = advisor.calendar.entry(month).or_default();
    record.available_days = available_days;

    if let Some((date, time_range)) = starter_slot {
        let slots = record.busy_slots.entry(date).or_default();
        if slots.contains(&time_range) {
            debug!(
                "Advisor {} already busy on {} at {}",
                advisor.id, date, time_range
            );
        } else {
            slots.push(time_range);
        }
    }

    advisor.updated_at = Utc::now();
    advisor
}

pub fn refresh_advisor(advisor: Advisor, month: YearMonth) -> Advisor {
    let available_days = derive_available_days(&advisor.office_hours, month);
    let starter_slot = derive_starter_busy_slot(&advisor.office_hours, &available_days, month);
    debug!(
        "Advisor {} has {} available day(s) in {}, starter slot {:?}",
        advisor.id,
        available_days.len(),
        month,
        starter_slot
    );
    apply_calendar_update(advisor, month, available_days, starter_slot)
}

/// Recomputes `month` for every advisor. Advisors are independent of each other.
pub fn refresh_month(advisors: Vec<Advisor>, month: YearMonth) -> Vec<Advisor> {
    advisors
        .into_iter()
        .map(|advisor| refresh_advisor(advisor, month))
        .collect()
}

#[cfg(test)]
#[path = "tests/deriver_tests.rs"]
mod tests;
