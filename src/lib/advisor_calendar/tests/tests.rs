use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::advisor_calendar::{
    deriver::refresh_month,
    models::advisor_model::{MonthRecord, OfficeDay, YearMonth},
};

use super::*;

fn fixture_path() -> PathBuf {
    PathBuf::from("tests/test.advisors.json")
}

fn read_advisors(path: &Path) -> Result<Vec<Advisor>, StoreError> {
    let fetched = decode_advisors(read_rows(path)?);
    assert!(fetched.rejected.is_empty());
    Ok(fetched.advisors)
}

fn april() -> YearMonth {
    "2025-04".parse().unwrap()
}

#[test]
fn read_rows_valid_json() {
    let advisors = read_advisors(&fixture_path()).unwrap();

    assert_eq!(advisors.len(), 4);
    assert_eq!(advisors[0].id, Uuid::from_u128(1));
    assert_eq!(advisors[0].last_name, "Иванов");
    assert_eq!(
        advisors[0].office_hours.get(OfficeDay::Wednesday),
        Some("13:00-15:00")
    );
    assert_eq!(advisors[1].phone, None);
    assert_eq!(advisors[2].email, None);
    assert!(advisors[2].office_hours.is_empty());
    assert!(advisors[2].calendar.is_empty());
    assert_eq!(
        advisors[3].office_hours.iter().collect::<Vec<_>>(),
        vec![(OfficeDay::Tuesday, "09:00-11:00")]
    );
    assert_eq!(
        advisors[3].month(april()).unwrap().available_days,
        BTreeSet::from([1, 2, 31])
    );
}

#[test]
fn read_rows_missing_file() {
    assert!(matches!(
        read_rows(&PathBuf::from("tests/no.such.file.json")),
        Err(StoreError::Io(_))
    ));
}

#[test]
fn decode_advisors_skips_only_broken_rows() {
    let mut rows = read_rows(&fixture_path()).unwrap();
    rows[1]["calendar"] = serde_json::json!({ "2025-4": { "available_days": [7] } });
    rows[2]["bachelors_limit"] = serde_json::json!(-1);
    rows[3]["calendar"] = serde_json::json!({
        "2025-04": { "available_days": [1], "busy_slots": null }
    });
    rows.push(serde_json::json!({ "last_name": "Без идентификатора" }));

    let fetched = decode_advisors(rows);

    assert_eq!(
        fetched.advisors.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![Uuid::from_u128(1), Uuid::from_u128(4)]
    );
    assert!(fetched.advisors[1].month(april()).unwrap().busy_slots.is_empty());
    assert_eq!(
        fetched.rejected.iter().map(|row| row.id).collect::<Vec<_>>(),
        vec![Some(Uuid::from_u128(2)), Some(Uuid::from_u128(3)), None]
    );
}

#[test]
fn write_json_keeps_previous_file_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("advisors.json");
    let rows = read_rows(&fixture_path()).unwrap();
    write_json(&path, &rows).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    // JSON object keys must be strings, so this fails halfway through serialization.
    let unwritable = BTreeMap::from([(vec![1u8], 1u8)]);
    assert!(matches!(write_json(&path, &unwritable), Err(StoreError::Json(_))));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(read_rows(&path).unwrap(), rows);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn log_violations_counts_stored_problems() {
    let advisors = read_advisors(&fixture_path()).unwrap();
    // Кузнецова: day 2 is a Wednesday and day 31 does not exist in April.
    assert_eq!(log_violations(&advisors), 2);
    assert_eq!(log_violations(&refresh_month(advisors, april())), 0);
}

#[test]
fn filter_advisors_by_name_or_field() {
    let advisors = read_advisors(&fixture_path()).unwrap();

    let names = |query: &str| {
        filter_advisors(advisors.clone(), query)
            .into_iter()
            .map(|advisor| advisor.last_name)
            .collect::<Vec<_>>()
    };

    assert_eq!(names("машинное"), vec!["Иванов", "Кузнецова"]);
    assert_eq!(names("ПЕТРОВА"), vec!["Петрова"]);
    assert_eq!(names("графов"), vec!["Сидоров"]);
    assert!(names("астрономия").is_empty());
    assert_eq!(names("  ").len(), 4);
}

#[test]
fn calendar_diff_equal_calendars() {
    let advisors = read_advisors(&fixture_path()).unwrap();
    assert_eq!(
        calendar_diff(&advisors[1].calendar, &advisors[1].calendar).unwrap(),
        None
    );
}

#[test]
fn calendar_diff_shows_new_month() {
    let old = BTreeMap::new();
    let new = BTreeMap::from([(
        april(),
        MonthRecord {
            available_days: BTreeSet::from([7]),
            busy_slots: BTreeMap::new(),
        },
    )]);

    let diff = calendar_diff(&old, &new).unwrap().unwrap();

    assert!(diff.contains("--- stored"));
    assert!(diff.contains("+++ derived"));
    assert!(diff.contains("-{}"));
    assert!(diff.contains("+  \"2025-04\": {"));
}
