//! End-to-end report generation: token, business days, revenue fan-out.
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, instrument};

use crate::aggregate::{aggregate, Aggregation, Progress};
use crate::apaleo::ApaleoService;
use crate::error::{ReportError, Result};
use crate::model::{AccessToken, BusinessDayRecord, ReportRequest};

/// Pull the `businessDays` array out of a property-performance body.
pub fn business_days(body: &Value) -> Result<Vec<BusinessDayRecord>> {
    let days = body
        .get("businessDays")
        .ok_or_else(|| ReportError::Schema("property-performance report has no businessDays".into()))?;
    if !days.is_array() {
        return Err(ReportError::Schema("businessDays is not an array".into()));
    }
    serde_json::from_value(days.clone())
        .map_err(|e| ReportError::Schema(format!("malformed business day: {e}")))
}

pub async fn fetch_business_days(
    api: &dyn ApaleoService,
    token: &AccessToken,
    property_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<BusinessDayRecord>> {
    let body = api
        .fetch_property_performance(token, property_id, from, to)
        .await?;
    business_days(&body)
}

/// Run one report generation. Token and report failures abort the run;
/// per-day revenue failures end up in `Aggregation::failures`.
#[instrument(skip_all, fields(property_id = %request.property_id, from = %request.from, to = %request.to))]
pub async fn generate<F>(
    api: &dyn ApaleoService,
    request: &ReportRequest,
    workers: usize,
    today: NaiveDate,
    on_progress: F,
) -> Result<Aggregation>
where
    F: FnMut(Progress),
{
    let token = api.fetch_token(&request.credentials).await?;
    info!("access token acquired");

    let days = fetch_business_days(
        api,
        &token,
        &request.property_id,
        request.from,
        request.to,
    )
    .await?;
    info!(days = days.len(), "business days received");

    Ok(aggregate(
        api,
        &token,
        &request.property_id,
        &days,
        workers,
        today,
        on_progress,
    )
    .await)
}
