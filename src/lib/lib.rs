pub mod advisor_calendar;
