use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use similar::TextDiff;
use tempfile::NamedTempFile;
use uuid::Uuid;

use super::{
    error::StoreError,
    models::advisor_model::{Advisor, Calendar},
    validation::validate_advisor,
};

/// A stored row that could not be read as an advisor. The rest of the batch goes on without it.
#[derive(Debug)]
pub struct RejectedRow {
    pub id: Option<Uuid>,
    pub error: serde_json::Error,
}

/// Advisors read from a store, together with the rows that had to be skipped.
#[derive(Debug, Default)]
pub struct FetchedAdvisors {
    pub advisors: Vec<Advisor>,
    pub rejected: Vec<RejectedRow>,
}

pub fn log_all_advisors(advisors: &[Advisor]) {
    for advisor in advisors.iter() {
        debug!(
            "Serving {} ({}), office hours {:?}, calendar months {:?}",
            advisor.last_name,
            advisor.id,
            advisor.office_hours,
            advisor.calendar.keys().map(ToString::to_string).collect::<Vec<_>>()
        );
    }
}

pub fn log_violations(advisors: &[Advisor]) -> usize {
    let mut count = 0;
    for advisor in advisors.iter() {
        for violation in validate_advisor(advisor) {
            warn!("Advisor {} ({}): {}", advisor.last_name, advisor.id, violation);
            count += 1;
        }
    }
    count
}

pub fn row_id(row: &Value) -> Option<Uuid> {
    row.get("id")?.as_str()?.parse().ok()
}

/* every row is decoded on its own, so one broken document only costs its own advisor */
pub fn decode_advisors(rows: Vec<Value>) -> FetchedAdvisors {
    let mut fetched = FetchedAdvisors::default();
    for row in rows {
        let id = row_id(&row);
        match serde_json::from_value::<Advisor>(row) {
            Ok(advisor) => fetched.advisors.push(advisor),
            Err(error) => {
                warn!("Skipping advisor row {:?}: {}", id, error);
                fetched.rejected.push(RejectedRow { id, error });
            }
        }
    }
    fetched
}

pub fn read_rows(path: &Path) -> Result<Vec<Value>, StoreError> {
    info!(
        "Reading advisors from {}",
        std::path::absolute(path)?.display()
    );
    let rows_file = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(rows_file)?)
}

/// Writes `value` next to `path` first and renames it over `path`,
/// so the previous content stays in place when anything fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    debug!("Writing {}", std::path::absolute(path)?.display());
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/* case-insensitive substring match on surname or research field */
pub fn filter_advisors(advisors: Vec<Advisor>, query: &str) -> Vec<Advisor> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return advisors;
    }
    advisors
        .into_iter()
        .filter(|advisor| {
            advisor.last_name.to_lowercase().contains(&query)
                || advisor.research_field.to_lowercase().contains(&query)
        })
        .collect()
}

/// Unified diff of two calendars in their stored JSON form, `None` when equal.
pub fn calendar_diff(old: &Calendar, new: &Calendar) -> Result<Option<String>, serde_json::Error> {
    if old == new {
        return Ok(None);
    }
    let old_json = serde_json::to_string_pretty(old)?;
    let new_json = serde_json::to_string_pretty(new)?;
    let diff = TextDiff::from_lines(&old_json, &new_json);
    Ok(Some(
        diff.unified_diff()
            .header("stored", "derived")
            .to_string(),
    ))
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
