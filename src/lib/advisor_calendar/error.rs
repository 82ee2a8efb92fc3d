use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid year-month {0:?}, expected YYYY-MM")]
    InvalidYearMonth(String),
}

/// Errors raised while reading advisors from, or writing them to, a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("advisor {0} does not exist in the store")]
    UnknownAdvisor(Uuid),

    #[error("store reported no updated row for advisor {0}")]
    NotUpdated(Uuid),
}
