use futures::future;
use log::{debug, error, info};
use uuid::Uuid;

use super::{
    advisor_store::AdvisorStore,
    deriver::refresh_advisor,
    error::StoreError,
    helpers::{
        calendar_diff, filter_advisors, log_all_advisors, log_violations, FetchedAdvisors,
        RejectedRow,
    },
    models::advisor_model::{Advisor, YearMonth},
};

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub search: Option<String>,
    pub dry_run: bool,
}

/// Outcome of one batch, per advisor.
/// `updated` lists advisors whose calendar changed (and was written, unless it is a dry run),
/// `unchanged` those already up to date, `failed` those whose write was rejected
/// and `rejected` the stored rows that could not be read as advisors at all.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub updated: Vec<Uuid>,
    pub unchanged: Vec<Uuid>,
    pub failed: Vec<(Uuid, StoreError)>,
    pub rejected: Vec<RejectedRow>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }
}

pub async fn run<S: AdvisorStore>(
    store: &S,
    months: &[YearMonth],
    options: &RunOptions,
) -> Result<BatchReport, StoreError> {
    let FetchedAdvisors { advisors, rejected } = store.fetch_all().await?;
    info!(
        "Found {} advisors in store, {} unreadable row(s)",
        advisors.len(),
        rejected.len()
    );
    let advisors = match &options.search {
        Some(query) => {
            let found = filter_advisors(advisors, query);
            info!("{} advisors match {:?}", found.len(), query);
            found
        }
        None => advisors,
    };
    log_all_advisors(&advisors);
    let violations = log_violations(&advisors);
    if violations > 0 {
        info!("Found {} stored calendar violation(s)", violations);
    }

    let mut report = BatchReport {
        rejected,
        ..BatchReport::default()
    };
    let mut changed: Vec<Advisor> = Vec::new();
    for advisor in advisors {
        let refreshed = months
            .iter()
            .fold(advisor.clone(), |acc, &month| refresh_advisor(acc, month));
        match calendar_diff(&advisor.calendar, &refreshed.calendar)? {
            Some(diff) => {
                debug!("Changes for {} ({}):\n{}", advisor.last_name, advisor.id, diff);
                changed.push(refreshed);
            }
            None => report.unchanged.push(advisor.id),
        }
    }
    info!(
        "Found {} changed advisor calendar(s) for {} month(s)",
        changed.len(),
        months.len()
    );

    if options.dry_run {
        info!("Dry run, nothing is written");
        report.updated = changed.iter().map(|advisor| advisor.id).collect();
        return Ok(report);
    }

    /* Every row is written on its own, one failure does not stop the rest */
    let results = future::join_all(changed.iter().map(|advisor| async move {
        (advisor.id, store.replace_calendar(advisor).await)
    }))
    .await;
    for (id, result) in results {
        match result {
            Ok(()) => {
                info!("Updated calendar of advisor {}", id);
                report.updated.push(id);
            }
            Err(err) => {
                error!("Failed to update advisor {}: {}", id, err);
                report.failed.push((id, err));
            }
        }
    }

    Ok(report)
}
