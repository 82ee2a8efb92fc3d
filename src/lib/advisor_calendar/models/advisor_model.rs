//! Typed model of a row of the `scientific_advisors` table.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::advisor_calendar::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfficeDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl OfficeDay {
    pub const ALL: [OfficeDay; 7] = [
        OfficeDay::Monday,
        OfficeDay::Tuesday,
        OfficeDay::Wednesday,
        OfficeDay::Thursday,
        OfficeDay::Friday,
        OfficeDay::Saturday,
        OfficeDay::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OfficeDay::Monday => "monday",
            OfficeDay::Tuesday => "tuesday",
            OfficeDay::Wednesday => "wednesday",
            OfficeDay::Thursday => "thursday",
            OfficeDay::Friday => "friday",
            OfficeDay::Saturday => "saturday",
            OfficeDay::Sunday => "sunday",
        }
    }

    /// Case-insensitive lookup of an English weekday name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(name))
    }

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for OfficeDay {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => OfficeDay::Monday,
            Weekday::Tue => OfficeDay::Tuesday,
            Weekday::Wed => OfficeDay::Wednesday,
            Weekday::Thu => OfficeDay::Thursday,
            Weekday::Fri => OfficeDay::Friday,
            Weekday::Sat => OfficeDay::Saturday,
            Weekday::Sun => OfficeDay::Sunday,
        }
    }
}

impl fmt::Display for OfficeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recurring weekly template: at most one time range per weekday.
///
/// Stored rows are free-form documents, so deserialization never fails:
/// anything that is not an object becomes empty office hours, and entries
/// with an unknown weekday or a non-string range are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OfficeHours(BTreeMap<OfficeDay, String>);

impl OfficeHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: OfficeDay, time_range: impl Into<String>) -> Option<String> {
        self.0.insert(day, time_range.into())
    }

    pub fn get(&self, day: OfficeDay) -> Option<&str> {
        self.0.get(&day).map(String::as_str)
    }

    pub fn contains(&self, day: OfficeDay) -> bool {
        self.0.contains_key(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OfficeDay, &str)> {
        self.0.iter().map(|(day, range)| (*day, range.as_str()))
    }

    fn from_json(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Self::default(),
            other => {
                warn!("Ignoring office hours that are not a mapping: {}", other);
                return Self::default();
            }
        };

        let mut office_hours = Self::default();
        for (key, range) in map {
            match (OfficeDay::from_name(&key), range) {
                (Some(day), Value::String(range)) => {
                    if let Some(replaced) = office_hours.insert(day, range) {
                        warn!(
                            "Office hours {:?} replace {:?} given for {} under another key",
                            key, replaced, day
                        );
                    }
                }
                (Some(_), range) => {
                    warn!("Ignoring office hours {:?} with non-string range {}", key, range)
                }
                (None, _) => warn!("Ignoring office hours for unknown weekday {:?}", key),
            }
        }
        office_hours
    }
}

impl FromIterator<(OfficeDay, String)> for OfficeHours {
    fn from_iter<I: IntoIterator<Item = (OfficeDay, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for OfficeHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_json(Value::deserialize(deserializer)?))
    }
}

/// One calendar month, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidYearMonth(format!("{:04}-{:02}", year, month));
        if !(0..=9999).contains(&year) {
            return Err(invalid());
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(invalid)
    }

    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    pub fn month(self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }

    /// The date of `day` in this month, if the month has such a day.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        self.first_day.with_day(day)
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        (1..=31).map_while(move |day| self.date(day))
    }

    pub fn days_in_month(self) -> u32 {
        self.days().count() as u32
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidYearMonth(s.to_owned());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let well_formed = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !well_formed(year, 4) || !well_formed(month, 2) {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Derived availability of one advisor in one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonthRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_days: BTreeSet<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub busy_slots: BTreeMap<NaiveDate, Vec<String>>,
}

pub type Calendar = BTreeMap<YearMonth, MonthRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Advisor {
    pub id: Uuid,
    pub last_name: String,
    pub research_field: String,
    pub bachelors_limit: u32,
    pub masters_limit: u32,
    pub phd_limit: u32,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub office_hours: OfficeHours,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calendar: Calendar,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advisor {
    pub fn month(&self, month: YearMonth) -> Option<&MonthRecord> {
        self.calendar.get(&month)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
