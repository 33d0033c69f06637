use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument};

use crate::apaleo::ApaleoService;
use crate::model::{AccessToken, BusinessDayRecord, DayFailure, ReportRow, ReportTable};
use crate::revenue::fetch_revenue;

/// Completed versus total revenue lookups, reported after each one resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Sorted rows plus the days that were dropped because their lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub table: ReportTable,
    pub failures: Vec<DayFailure>,
}

/// Fetch revenue for every business day with at most `workers` requests in
/// flight and merge each result into a row as it completes.
///
/// Results are consumed here, on the calling task, in completion order, so
/// the row buffer needs no lock. A failed day is recorded and skipped; the
/// rest of the batch carries on.
#[instrument(skip_all, fields(days = days.len(), workers = workers))]
pub async fn aggregate<F>(
    api: &dyn ApaleoService,
    token: &AccessToken,
    property_id: &str,
    days: &[BusinessDayRecord],
    workers: usize,
    today: NaiveDate,
    mut on_progress: F,
) -> Aggregation
where
    F: FnMut(Progress),
{
    let total = days.len();
    let mut in_flight = stream::iter(days.iter().map(|day| async move {
        let result = fetch_revenue(api, token, property_id, day.business_day, today).await;
        (day, result)
    }))
    .buffer_unordered(workers.max(1));

    let mut rows = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut completed = 0;
    while let Some((day, result)) = in_flight.next().await {
        completed += 1;
        match result {
            Ok(sample) => rows.push(ReportRow::merge(day, sample)),
            Err(err) => {
                error!(business_day = %day.business_day, %err, "revenue lookup failed; day omitted");
                failures.push(DayFailure {
                    business_day: day.business_day,
                    message: err.to_string(),
                });
            }
        }
        on_progress(Progress { completed, total });
    }

    info!(rows = rows.len(), failed = failures.len(), "revenue fan-out finished");
    Aggregation {
        table: ReportTable::from_rows(rows),
        failures,
    }
}
