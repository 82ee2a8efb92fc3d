//! Checks of stored calendars against the advisor's office hours.
use std::fmt;

use chrono::NaiveDate;

use super::models::advisor_model::{Advisor, OfficeDay, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarViolation {
    DayOutsideMonth {
        month: YearMonth,
        day: u32,
    },
    DayWithoutOfficeHours {
        month: YearMonth,
        day: u32,
        weekday: OfficeDay,
    },
    SlotOutsideMonth {
        month: YearMonth,
        date: NaiveDate,
    },
    SlotWithoutOfficeHours {
        month: YearMonth,
        date: NaiveDate,
        weekday: OfficeDay,
    },
}

impl fmt::Display for CalendarViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarViolation::DayOutsideMonth { month, day } => {
                write!(f, "{}: day {} does not exist", month, day)
            }
            CalendarViolation::DayWithoutOfficeHours { month, day, weekday } => write!(
                f,
                "{}: day {} is available but there are no office hours on {}",
                month, day, weekday
            ),
            CalendarViolation::SlotOutsideMonth { month, date } => {
                write!(f, "{}: busy slot on {} belongs to another month", month, date)
            }
            CalendarViolation::SlotWithoutOfficeHours { month, date, weekday } => write!(
                f,
                "{}: busy slot on {} but there are no office hours on {}",
                month, date, weekday
            ),
        }
    }
}

/// Lists every stored day or busy slot that contradicts the office hours.
pub fn validate_advisor(advisor: &Advisor) -> Vec<CalendarViolation> {
    let mut violations = Vec::new();

    for (&month, record) in &advisor.calendar {
        for &day in &record.available_days {
            match month.date(day) {
                None => violations.push(CalendarViolation::DayOutsideMonth { month, day }),
                Some(date) => {
                    let weekday = OfficeDay::of(date);
                    if !advisor.office_hours.contains(weekday) {
                        violations.push(CalendarViolation::DayWithoutOfficeHours {
                            month,
                            day,
                            weekday,
                        });
                    }
                }
            }
        }

        for &date in record.busy_slots.keys() {
            if !month.contains(date) {
                violations.push(CalendarViolation::SlotOutsideMonth { month, date });
            }
            let weekday = OfficeDay::of(date);
            if !advisor.office_hours.contains(weekday) {
                violations.push(CalendarViolation::SlotWithoutOfficeHours {
                    month,
                    date,
                    weekday,
                });
            }
        }
    }

    violations
}
