use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{
    error::StoreError,
    helpers::{decode_advisors, read_rows, row_id, write_json, FetchedAdvisors},
    models::{
        advisor_model::{Advisor, Calendar},
        Config,
    },
};

/// A trait, necessary for every storage the advisors can be read from and written back to.
#[allow(async_fn_in_trait)]
pub trait AdvisorStore {
    /// Every row is decoded separately; rows that are not valid advisors are returned as rejected.
    async fn fetch_all(&self) -> Result<FetchedAdvisors, StoreError>;

    /// Replaces the calendar and the update timestamp of one advisor in a single write.
    async fn replace_calendar(&self, advisor: &Advisor) -> Result<(), StoreError>;
}

/// Advisors kept as a JSON array in a file, the same shape the table is exported in.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AdvisorStore for JsonFileStore {
    async fn fetch_all(&self) -> Result<FetchedAdvisors, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(decode_advisors(read_rows(&self.path)?))
    }

    /* other rows are written back exactly as read, including the ones that do not decode */
    async fn replace_calendar(&self, advisor: &Advisor) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = read_rows(&self.path)?;
        let stored = rows
            .iter_mut()
            .find(|row| row_id(row) == Some(advisor.id))
            .and_then(Value::as_object_mut)
            .ok_or(StoreError::UnknownAdvisor(advisor.id))?;
        stored.insert("calendar".to_owned(), serde_json::to_value(&advisor.calendar)?);
        stored.insert("updated_at".to_owned(), serde_json::to_value(advisor.updated_at)?);
        write_json(&self.path, &rows)
    }
}

#[derive(Serialize)]
struct CalendarPatch<'a> {
    calendar: &'a Calendar,
    updated_at: DateTime<Utc>,
}

/// Advisors behind a PostgREST-compatible endpoint, e.g. a Supabase project.
pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
    table: String,
}

impl RestStore {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_owned(),
            key: config.supabase_key.to_owned(),
            table: config.table.to_owned(),
        })
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

impl AdvisorStore for RestStore {
    async fn fetch_all(&self) -> Result<FetchedAdvisors, StoreError> {
        let request_url = self.table_url();
        info!("Fetching advisors from {}", request_url);
        let rows: Vec<Value> = self
            .client
            .get(request_url)
            .query(&[("select", "*")])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!("Received {} advisor rows", rows.len());
        Ok(decode_advisors(rows))
    }

    async fn replace_calendar(&self, advisor: &Advisor) -> Result<(), StoreError> {
        debug!("Updating calendar of advisor {}", advisor.id);
        let patch = CalendarPatch {
            calendar: &advisor.calendar,
            updated_at: advisor.updated_at,
        };
        let updated_rows: Vec<Value> = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{}", advisor.id))])
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if updated_rows.is_empty() {
            return Err(StoreError::NotUpdated(advisor.id));
        }
        Ok(())
    }
}
